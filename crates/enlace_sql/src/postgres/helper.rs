/// this file contains helper logic for generating postgres queries
use crate::base::SqlTableNames;

pub const USER_SUMMARY_COLUMNS: &str = "id, created_at, username, role, active";
pub const BENEFICIARY_COLUMNS: &str =
    "id, community_id, full_name, gender, age, program, active, created_at";
pub const VOLUNTEER_COLUMNS: &str =
    "id, full_name, email, community_id, hours, active, created_at";
pub const FORM_TEMPLATE_COLUMNS: &str = "uid, name, section_key, fields, created_at, archived_at";

pub struct PostgresQueryHelper;

impl PostgresQueryHelper {
    pub fn get_role_grants_query() -> String {
        format!(
            "SELECT r.name AS role, r.is_admin AS is_admin, rs.section_key AS section_key
            FROM {} r
            LEFT JOIN {} rs ON rs.role = r.name
            ORDER BY r.name, rs.section_key",
            SqlTableNames::Roles,
            SqlTableNames::RoleSections
        )
    }

    pub fn get_user_insert_query() -> String {
        format!(
            "INSERT INTO {} (username, password_hash, role) VALUES ($1, $2, $3) RETURNING {}",
            SqlTableNames::Users,
            USER_SUMMARY_COLUMNS
        )
    }

    pub fn get_user_query() -> String {
        format!(
            "SELECT id, created_at, username, password_hash, role, active FROM {} WHERE username = $1",
            SqlTableNames::Users
        )
    }

    pub fn get_user_by_id_query() -> String {
        format!(
            "SELECT id, created_at, username, password_hash, role, active FROM {} WHERE id = $1",
            SqlTableNames::Users
        )
    }

    pub fn get_users_query() -> String {
        format!(
            "SELECT {} FROM {} ORDER BY username",
            USER_SUMMARY_COLUMNS,
            SqlTableNames::Users
        )
    }

    pub fn get_user_role_update_query() -> String {
        format!(
            "UPDATE {} SET role = $1 WHERE id = $2 RETURNING {}",
            SqlTableNames::Users,
            USER_SUMMARY_COLUMNS
        )
    }

    pub fn get_user_active_update_query() -> String {
        format!(
            "UPDATE {} SET active = $1 WHERE id = $2 RETURNING {}",
            SqlTableNames::Users,
            USER_SUMMARY_COLUMNS
        )
    }

    pub fn get_community_insert_query() -> String {
        format!(
            "INSERT INTO {} (name, municipality) VALUES ($1, $2) RETURNING id, name, municipality, created_at",
            SqlTableNames::Communities
        )
    }

    pub fn get_communities_query() -> String {
        format!(
            "SELECT id, name, municipality, created_at FROM {} ORDER BY name",
            SqlTableNames::Communities
        )
    }

    pub fn get_beneficiary_insert_query() -> String {
        format!(
            "INSERT INTO {} (community_id, full_name, gender, age, program) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            SqlTableNames::Beneficiaries,
            BENEFICIARY_COLUMNS
        )
    }

    pub fn get_volunteer_insert_query() -> String {
        format!(
            "INSERT INTO {} (full_name, email, community_id, hours) VALUES ($1, $2, $3, $4) RETURNING {}",
            SqlTableNames::Volunteers,
            VOLUNTEER_COLUMNS
        )
    }

    pub fn get_organization_insert_query() -> String {
        format!(
            "INSERT INTO {} (name, contact_email, community_id) VALUES ($1, $2, $3) RETURNING id, name, contact_email, community_id, created_at",
            SqlTableNames::Organizations
        )
    }

    pub fn get_organizations_query() -> String {
        format!(
            "SELECT id, name, contact_email, community_id, created_at FROM {} ORDER BY name",
            SqlTableNames::Organizations
        )
    }

    pub fn get_form_template_insert_query() -> String {
        format!(
            "INSERT INTO {} (uid, name, section_key, fields) VALUES ($1, $2, $3, $4) RETURNING {}",
            SqlTableNames::FormTemplates,
            FORM_TEMPLATE_COLUMNS
        )
    }

    pub fn get_form_template_archive_query() -> String {
        format!(
            "UPDATE {} SET archived_at = COALESCE(archived_at, CURRENT_TIMESTAMP) WHERE uid = $1 RETURNING {}",
            SqlTableNames::FormTemplates,
            FORM_TEMPLATE_COLUMNS
        )
    }

    pub fn get_form_template_restore_query() -> String {
        format!(
            "UPDATE {} SET archived_at = NULL WHERE uid = $1 RETURNING {}",
            SqlTableNames::FormTemplates,
            FORM_TEMPLATE_COLUMNS
        )
    }

    pub fn get_program_count_query() -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE program = $1",
            SqlTableNames::Beneficiaries
        )
    }

    pub fn get_active_form_template_count_query() -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE archived_at IS NULL",
            SqlTableNames::FormTemplates
        )
    }
}
