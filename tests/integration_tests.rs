//! Integration tests for the access model.

use access_model::{
    AccessConfig, AccessModel, BatchOperations, BatchRoleOperation, Error, GrantSet, Principal,
    RemovalOutcome, RemovalPolicy, RoleChange, STANDARD_ROLE_ORDER, Storage, form, grants,
};

#[test]
fn test_viewer_end_to_end() {
    let mut model = AccessModel::new();
    let mut user = Principal::new("viewer@admin.com");

    model.assign_role(&mut user, "viewer").unwrap();

    let expected = grants! {
        "viewer" => true,
        "platform.index" => true,
        "list stories" => true,
        "show stories" => true,
        "list categories" => true,
        "show categories" => true,
        "list tags" => true,
        "show tags" => true,
        "view analytics" => true,
    };
    assert_eq!(user.grants(), &expected);
    assert_eq!(user.grants().len(), 9);

    assert!(model.in_role(&user, "viewer").unwrap());
    assert!(model.has_permission(&user, "list stories"));
    assert!(!model.has_permission(&user, "create stories"));
    assert_eq!(model.primary_role(&user), Some("viewer"));

    let outcome = model.remove_role(&mut user, "viewer").unwrap();
    assert_eq!(outcome, RemovalOutcome::Removed);
    assert!(user.grants().is_empty());
    assert!(model.load_grants("viewer@admin.com").unwrap().is_empty());
}

#[test]
fn test_super_admin_holds_every_registered_permission() {
    let mut model = AccessModel::new();
    let mut user = Principal::new("superadmin@admin.com");

    model.assign_role(&mut user, "super-admin").unwrap();

    for descriptor in model.registry().all_permissions() {
        assert!(
            model.has_permission(&user, descriptor.name),
            "missing {}",
            descriptor.name
        );
    }
    // role markers are not permissions of the super-admin role
    for slug in &STANDARD_ROLE_ORDER[1..] {
        assert!(!model.in_role(&user, *slug).unwrap());
    }
    assert_eq!(model.primary_role(&user), Some("super-admin"));
}

#[test]
fn test_shared_removal_policies() {
    for (policy, keeps_shared) in [
        (RemovalPolicy::PreserveShared, true),
        (RemovalPolicy::StripAll, false),
    ] {
        let mut model = AccessModel::with_config(AccessConfig {
            removal_policy: policy,
            ..AccessConfig::default()
        });
        let mut user = Principal::new("u1");
        model.assign_role(&mut user, "author").unwrap();
        model.assign_role(&mut user, "viewer").unwrap();

        model.remove_role(&mut user, "viewer").unwrap();

        assert!(model.in_role(&user, "author").unwrap());
        assert!(!model.in_role(&user, "viewer").unwrap());
        assert!(!model.has_permission(&user, "view analytics"));
        assert_eq!(model.has_permission(&user, "list stories"), keeps_shared);
        assert!(model.has_permission(&user, "create stories"));
    }
}

#[test]
fn test_role_names_and_primary_role() {
    let mut model = AccessModel::new();
    let mut user = Principal::new("u1");
    model.assign_role(&mut user, "viewer").unwrap();
    model.assign_role(&mut user, "editor").unwrap();

    assert_eq!(model.role_names(&user), ["editor", "viewer"]);
    assert_eq!(model.primary_role(&user), Some("editor"));

    model.remove_role(&mut user, "editor").unwrap();
    assert_eq!(model.primary_role(&user), Some("viewer"));
}

#[test]
fn test_form_submission_round_trip_through_matrix() {
    let mut model = AccessModel::new();
    let mut user = Principal::new("u1");
    model.assign_role(&mut user, "author").unwrap();

    // Submit the editor as rendered, unchecking one box and checking another.
    let fields: Vec<(String, &str)> = model
        .permission_matrix(&user)
        .iter()
        .flat_map(|group| group.permissions.iter())
        .map(|control| {
            let checked = match control.name {
                "update stories" => false,
                "delete tags" => true,
                _ => control.active,
            };
            (control.field.clone(), if checked { "1" } else { "0" })
        })
        .collect();

    model.apply_form_submission(&mut user, fields).unwrap();

    assert!(!model.has_permission(&user, "update stories"));
    assert!(model.has_permission(&user, "delete tags"));
    assert!(model.has_permission(&user, "create stories"));
    assert!(model.in_role(&user, "author").unwrap());

    let matrix = model.permission_matrix(&user);
    let update = matrix
        .iter()
        .flat_map(|group| group.permissions.iter())
        .find(|control| control.name == "update stories")
        .unwrap();
    assert!(!update.active);
    assert!(update.indeterminate);
}

#[test]
fn test_bulk_update_leaves_unlisted_entries() {
    let mut model = AccessModel::new();
    let mut user = Principal::new("u1");
    model.assign_role(&mut user, "viewer").unwrap();

    let updates: GrantSet = [("view analytics", false), ("export analytics", true)]
        .into_iter()
        .collect();
    model.update_permissions(&mut user, &updates).unwrap();

    assert!(!model.has_permission(&user, "view analytics"));
    assert!(model.has_permission(&user, "export analytics"));
    assert!(model.has_permission(&user, "show tags"));
    assert_eq!(model.metrics().snapshot().bulk_updates, 1);
}

#[test]
fn test_seeding_accounts_in_batch() {
    let mut model = AccessModel::new();
    let accounts = [
        ("superadmin@admin.com", "super-admin"),
        ("admin@admin.com", "admin"),
        ("editor@admin.com", "editor"),
        ("author@admin.com", "author"),
        ("viewer@admin.com", "viewer"),
    ];
    for (id, _) in accounts {
        model.save_principal(&Principal::new(id)).unwrap();
    }

    let result = model.batch_role_operations(
        accounts
            .iter()
            .map(|(id, role)| BatchRoleOperation::assignment(*id, *role))
            .collect(),
    );

    assert!(result.all_succeeded());
    assert!(result.successes.iter().all(|(_, change)| *change == RoleChange::Assigned));

    for (id, role) in accounts {
        let user = model.load_principal(id).unwrap();
        assert_eq!(model.primary_role(&user), Some(role));
    }
    assert_eq!(model.storage().principal_count(), 5);
}

#[test]
fn test_load_missing_principal() {
    let model = AccessModel::new();
    assert!(matches!(
        model.load_principal("nobody"),
        Err(Error::PrincipalNotFound(id)) if id == "nobody"
    ));
    assert!(matches!(
        model.load_grants("nobody"),
        Err(Error::PrincipalNotFound(_))
    ));
}

#[test]
fn test_field_names_match_editor_encoding() {
    assert_eq!(form::field_name("list stories"), "permissions.bGlzdCBzdG9yaWVz");
    let decoded = form::decode_field_name("permissions.bGlzdCBzdG9yaWVz")
        .unwrap()
        .unwrap();
    assert_eq!(decoded, "list stories");
}

#[cfg(feature = "persistence")]
mod file_storage {
    use super::*;
    use access_model::{FileStorage, Role, RoleCatalog};
    use tempfile::TempDir;

    #[test]
    fn test_grants_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("access.json");

        {
            let storage = FileStorage::new(&path).unwrap();
            let mut model = AccessModel::with_storage(storage, AccessConfig::default());
            let mut user = Principal::new("editor@admin.com").with_name("Editor");
            model.assign_role(&mut user, "editor").unwrap();
            model
                .register_role(Role::new("editor").with_name("Editor"))
                .unwrap();
        }

        let storage = FileStorage::new(&path).unwrap();
        let model = AccessModel::with_storage(storage, AccessConfig::default());
        let user = model.load_principal("editor@admin.com").unwrap();

        assert_eq!(user.name(), Some("Editor"));
        assert!(model.in_role(&user, "editor").unwrap());
        assert!(model.has_permission(&user, "publish stories"));
        assert_eq!(model.role("editor").unwrap().unwrap().name(), "Editor");
        assert_eq!(model.storage().list_roles().unwrap(), ["editor"]);
    }

    #[test]
    fn test_legacy_document_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("access.json");
        std::fs::write(
            &path,
            r#"{
                "principals": {
                    "old@admin.com": {
                        "id": "old@admin.com",
                        "permissions": { "viewer": 1, "list stories": 1, "view analytics": 0 }
                    },
                    "new@admin.com": { "id": "new@admin.com", "permissions": null }
                }
            }"#,
        )
        .unwrap();

        let model = AccessModel::with_storage(FileStorage::new(&path).unwrap(), AccessConfig::default());

        let old = model.load_principal("old@admin.com").unwrap();
        assert!(model.in_role(&old, "viewer").unwrap());
        assert!(model.has_permission(&old, "list stories"));
        assert!(!model.has_permission(&old, "view analytics"));

        let new = model.load_principal("new@admin.com").unwrap();
        assert!(new.grants().is_empty());
    }

    #[test]
    fn test_catalog_from_json_drives_model() {
        let catalog = RoleCatalog::from_json(
            r#"{ "support": ["list users", "show users"], "auditor": ["view logs"] }"#,
        )
        .unwrap();
        let mut model = AccessModel::new().with_catalog(catalog).unwrap();
        let mut user = Principal::new("u1");

        model.assign_role(&mut user, "support").unwrap();

        assert!(model.has_permission(&user, "show users"));
        assert!(!model.has_permission(&user, "view logs"));
        assert_eq!(model.catalog().slugs().collect::<Vec<_>>(), ["support", "auditor"]);
    }

    #[test]
    fn test_failed_save_is_not_visible_through_storage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("access.json");
        let storage = FileStorage::new(&path).unwrap();
        let mut model = AccessModel::with_storage(storage, AccessConfig::default());

        let mut user = Principal::new("u1");
        model.assign_role(&mut user, "viewer").unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let error = model.assign_role(&mut user, "admin").unwrap_err();
        assert!(error.is_persistence_failure());
        // the caller's copy changed, the stored one did not
        assert!(user.has_role("admin"));
        let stored = model.load_principal("u1").unwrap();
        assert!(!model.in_role(&stored, "admin").unwrap());
        assert!(model.in_role(&stored, "viewer").unwrap());

        // batch operations reload from storage, so they see the durable state
        let result =
            model.batch_role_operations(vec![BatchRoleOperation::removal("u1", "admin")]);
        assert_eq!(
            result.successes,
            [(0, RoleChange::Removed(RemovalOutcome::NotFound))]
        );
        assert_eq!(model.metrics().snapshot().persistence_failures, 1);
    }
}
