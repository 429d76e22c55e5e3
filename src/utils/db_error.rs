//! Helpers for inspecting database errors.

/// Returns the name of the violated unique constraint, if `e` is a unique violation.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<String> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    Some(db_err.constraint().unwrap_or_default().to_string())
}
