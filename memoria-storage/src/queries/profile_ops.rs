use memoria_core::errors::CortexResult;
use memoria_core::models::UserProfile;
use rusqlite::{params, Connection, OptionalExtension};

use crate::to_storage_err;

pub fn get(conn: &Connection, user_id: &str) -> CortexResult<Option<UserProfile>> {
    conn.query_row(
        "SELECT user_id, goals_json, values_json, data_json FROM user_profiles WHERE user_id = ?1",
        params![user_id],
        |row| {
            let goals_json: String = row.get(1)?;
            let values_json: String = row.get(2)?;
            let data_json: String = row.get(3)?;
            Ok((row.get::<_, String>(0)?, goals_json, values_json, data_json))
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(|(user_id, goals_json, values_json, data_json)| {
        Ok(UserProfile {
            user_id,
            goals: serde_json::from_str(&goals_json).map_err(|e| to_storage_err(e.to_string()))?,
            values: serde_json::from_str(&values_json).map_err(|e| to_storage_err(e.to_string()))?,
            data: serde_json::from_str(&data_json).map_err(|e| to_storage_err(e.to_string()))?,
        })
    })
    .transpose()
}

pub fn put(conn: &Connection, profile: &UserProfile) -> CortexResult<()> {
    let goals_json = serde_json::to_string(&profile.goals).map_err(|e| to_storage_err(e.to_string()))?;
    let values_json =
        serde_json::to_string(&profile.values).map_err(|e| to_storage_err(e.to_string()))?;
    let data_json = serde_json::to_string(&profile.data).map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT OR REPLACE INTO user_profiles (user_id, goals_json, values_json, data_json) \
         VALUES (?1, ?2, ?3, ?4)",
        params![profile.user_id, goals_json, values_json, data_json],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
