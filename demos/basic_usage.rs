//! Example walking through the access model the way the back office uses it.

use access_model::{AccessModel, Principal, RemovalOutcome, form};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize audit logging
    #[cfg(feature = "audit")]
    access_model::init_audit_logger();

    let mut model = AccessModel::new();

    // Seed the standard accounts
    let mut admin = Principal::new("admin@admin.com").with_name("Admin");
    let mut editor = Principal::new("editor@admin.com").with_name("Editor");
    let mut viewer = Principal::new("viewer@admin.com").with_name("Viewer");

    model.assign_role(&mut admin, "admin")?;
    model.assign_role(&mut editor, "editor")?;
    model.assign_role(&mut viewer, "viewer")?;

    for user in [&admin, &editor, &viewer] {
        println!(
            "{} ({}): primary role {:?}, can delete stories: {}",
            user.effective_name(),
            user.id(),
            model.primary_role(user),
            model.has_permission(user, "delete stories")
        );
    }

    // Give the editor a second role, then take the first one away
    model.assign_role(&mut editor, "viewer")?;
    let outcome = model.remove_role(&mut editor, "editor")?;
    println!(
        "Editor removal: {:?}; still views analytics: {}; still publishes: {}",
        outcome,
        model.has_permission(&editor, "view analytics"),
        model.has_permission(&editor, "publish stories")
    );

    // Removing a role nobody holds is reported, not an error
    if model.remove_role(&mut viewer, "super-admin")? == RemovalOutcome::NotFound {
        println!("Viewer never held super-admin");
    }

    // Submit the permission editor for the viewer
    model.apply_form_submission(
        &mut viewer,
        [
            (form::field_name("view analytics"), "0"),
            (form::field_name("export analytics"), "1"),
        ],
    )?;

    for group in model.permission_matrix(&viewer) {
        let shown: Vec<String> = group
            .permissions
            .iter()
            .filter(|control| control.active || control.indeterminate)
            .map(|control| {
                let mark = if control.active { "x" } else { "-" };
                format!("[{mark}] {}", control.description)
            })
            .collect();

        if !shown.is_empty() {
            println!("{}: {}", group.title, shown.join(", "));
        }
    }

    let snapshot = model.metrics().snapshot();
    println!(
        "{} assignments, {} removals, {} checks",
        snapshot.role_assignments,
        snapshot.role_removals,
        snapshot.checks_total()
    );

    Ok(())
}
