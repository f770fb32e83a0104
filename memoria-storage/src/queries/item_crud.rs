//! Insert/get/update/delete for `memory_items`. Structured sub-fields
//! (`source`, `quality`, `stats`, `embedding`, `versioning`, `personality`)
//! are stored as JSON text columns; everything queried or indexed on its
//! own lives in a plain column.

use chrono::{DateTime, Utc};
use memoria_core::errors::CortexResult;
use memoria_core::models::{Language, MemoryItem, Status, Tier};
use rusqlite::{params, Connection, OptionalExtension};

use crate::to_storage_err;

const SELECT_COLUMNS: &str = "memory_id, user_id, org_id, tier, status, text, summary, \
    tags_json, entities_json, source_json, quality_json, stats_json, created_at, updated_at, \
    archived_at, expires_at, embedding_json, versioning_json, personality_json, language, \
    always_inject, needs_reindex, reindex_reason, sanitized_backup";

pub fn insert(conn: &Connection, item: &MemoryItem) -> CortexResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO memory_items ({SELECT_COLUMNS}) VALUES \
            (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21,?22,?23,?24)"
        ),
        item_params(item)?.as_slice(),
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn insert_bulk(conn: &Connection, items: &[MemoryItem]) -> CortexResult<usize> {
    if items.is_empty() {
        return Ok(0);
    }
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_bulk begin: {e}")))?;
    let mut count = 0;
    for item in items {
        if let Err(e) = insert(&tx, item) {
            let _ = tx.rollback();
            return Err(e);
        }
        count += 1;
    }
    tx.commit()
        .map_err(|e| to_storage_err(format!("insert_bulk commit: {e}")))?;
    Ok(count)
}

pub fn get(conn: &Connection, user_id: &str, memory_id: &str) -> CortexResult<Option<MemoryItem>> {
    conn.query_row(
        &format!("SELECT {SELECT_COLUMNS} FROM memory_items WHERE user_id = ?1 AND memory_id = ?2"),
        params![user_id, memory_id],
        row_to_item,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .transpose()
}

pub fn get_bulk(conn: &Connection, user_id: &str, memory_ids: &[String]) -> CortexResult<Vec<MemoryItem>> {
    let mut out = Vec::with_capacity(memory_ids.len());
    for id in memory_ids {
        if let Some(item) = get(conn, user_id, id)? {
            out.push(item);
        }
    }
    Ok(out)
}

pub fn update(conn: &Connection, item: &MemoryItem) -> CortexResult<()> {
    let rows = conn
        .execute(
            "UPDATE memory_items SET
                org_id = ?3, tier = ?4, status = ?5, text = ?6, summary = ?7,
                tags_json = ?8, entities_json = ?9, source_json = ?10, quality_json = ?11,
                stats_json = ?12, updated_at = ?14, archived_at = ?15, expires_at = ?16,
                embedding_json = ?17, versioning_json = ?18, personality_json = ?19,
                language = ?20, always_inject = ?21, needs_reindex = ?22, reindex_reason = ?23,
                sanitized_backup = ?24
             WHERE memory_id = ?1 AND user_id = ?2",
            item_params(item)?.as_slice(),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if rows == 0 {
        return Err(to_storage_err(format!(
            "update: memory_id {} not found for user {}",
            item.memory_id, item.user_id
        )));
    }
    Ok(())
}

pub fn delete(conn: &Connection, user_id: &str, memory_id: &str) -> CortexResult<()> {
    conn.execute(
        "DELETE FROM memory_items WHERE user_id = ?1 AND memory_id = ?2",
        params![user_id, memory_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_by_tier(
    conn: &Connection,
    user_id: &str,
    tier: Tier,
    limit: usize,
    offset: usize,
) -> CortexResult<Vec<MemoryItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_items WHERE user_id = ?1 AND tier = ?2 \
             ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![user_id, tier.as_str(), limit as i64, offset as i64],
            row_to_item,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect()
}

pub fn list_needing_reindex(conn: &Connection, limit: usize) -> CortexResult<Vec<MemoryItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_items WHERE needs_reindex = 1 LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], row_to_item)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect()
}

pub fn list_expired(
    conn: &Connection,
    tier: Tier,
    as_of: DateTime<Utc>,
    limit: usize,
) -> CortexResult<Vec<MemoryItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_items \
             WHERE tier = ?1 AND expires_at IS NOT NULL AND expires_at <= ?2 LIMIT ?3"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![tier.as_str(), as_of.to_rfc3339(), limit as i64],
            row_to_item,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect()
}

pub fn sample_active(conn: &Connection, user_id: &str, limit: usize) -> CortexResult<Vec<MemoryItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM memory_items \
             WHERE user_id = ?1 AND status = 'active' ORDER BY updated_at DESC LIMIT ?2"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id, limit as i64], row_to_item)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?
        .into_iter()
        .collect()
}

pub fn list_user_ids(conn: &Connection, limit: usize) -> CortexResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT user_id FROM memory_items WHERE status = 'active' \
             ORDER BY user_id LIMIT ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_by_tier(conn: &Connection, user_id: &str) -> CortexResult<Vec<(Tier, usize)>> {
    let mut stmt = conn
        .prepare("SELECT tier, COUNT(*) FROM memory_items WHERE user_id = ?1 GROUP BY tier")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            let tier_str: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((tier_str, count as usize))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (tier_str, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let tier = parse_tier(&tier_str)?;
        out.push((tier, count));
    }
    Ok(out)
}

fn item_params(item: &MemoryItem) -> CortexResult<Vec<Box<dyn rusqlite::ToSql>>> {
    let tags_json = serde_json::to_string(&item.tags).map_err(|e| to_storage_err(e.to_string()))?;
    let entities_json =
        serde_json::to_string(&item.entities).map_err(|e| to_storage_err(e.to_string()))?;
    let source_json = serde_json::to_string(&item.source).map_err(|e| to_storage_err(e.to_string()))?;
    let quality_json =
        serde_json::to_string(&item.quality).map_err(|e| to_storage_err(e.to_string()))?;
    let stats_json = serde_json::to_string(&item.stats).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding_json = item
        .embedding
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let versioning_json =
        serde_json::to_string(&item.versioning).map_err(|e| to_storage_err(e.to_string()))?;
    let personality_json = item
        .personality
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(vec![
        Box::new(item.memory_id.clone()),
        Box::new(item.user_id.clone()),
        Box::new(item.org_id.clone()),
        Box::new(item.tier.as_str().to_string()),
        Box::new(item.status.as_str().to_string()),
        Box::new(item.text.clone()),
        Box::new(item.summary.clone()),
        Box::new(tags_json),
        Box::new(entities_json),
        Box::new(source_json),
        Box::new(quality_json),
        Box::new(stats_json),
        Box::new(item.created_at.to_rfc3339()),
        Box::new(item.updated_at.to_rfc3339()),
        Box::new(item.archived_at.map(|t| t.to_rfc3339())),
        Box::new(item.expires_at.map(|t| t.to_rfc3339())),
        Box::new(embedding_json),
        Box::new(versioning_json),
        Box::new(personality_json),
        Box::new(format!("{:?}", item.language).to_lowercase()),
        Box::new(item.always_inject as i32),
        Box::new(item.needs_reindex as i32),
        Box::new(item.reindex_reason.clone()),
        Box::new(item.sanitized_backup.clone()),
    ])
}

fn parse_tier(s: &str) -> CortexResult<Tier> {
    match s {
        "working" => Ok(Tier::Working),
        "history" => Ok(Tier::History),
        "patterns" => Ok(Tier::Patterns),
        "documents" => Ok(Tier::Documents),
        "memory_bank" => Ok(Tier::MemoryBank),
        "datagov_schema" => Ok(Tier::DatagovSchema),
        "datagov_expansion" => Ok(Tier::DatagovExpansion),
        other => Err(to_storage_err(format!("unknown tier '{other}'"))),
    }
}

fn parse_status(s: &str) -> CortexResult<Status> {
    match s {
        "active" => Ok(Status::Active),
        "archived" => Ok(Status::Archived),
        "deleted" => Ok(Status::Deleted),
        other => Err(to_storage_err(format!("unknown status '{other}'"))),
    }
}

fn parse_language(s: &str) -> Language {
    match s {
        "he" => Language::He,
        "en" => Language::En,
        "mixed" => Language::Mixed,
        _ => Language::None,
    }
}

fn parse_dt(s: &str) -> CortexResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<CortexResult<MemoryItem>> {
    Ok((|| -> CortexResult<MemoryItem> {
        let tier_str: String = row.get(3)?;
        let status_str: String = row.get(4)?;
        let tags_json: String = row.get(7)?;
        let entities_json: String = row.get(8)?;
        let source_json: String = row.get(9)?;
        let quality_json: String = row.get(10)?;
        let stats_json: String = row.get(11)?;
        let created_at: String = row.get(12)?;
        let updated_at: String = row.get(13)?;
        let archived_at: Option<String> = row.get(14)?;
        let expires_at: Option<String> = row.get(15)?;
        let embedding_json: Option<String> = row.get(16)?;
        let versioning_json: String = row.get(17)?;
        let personality_json: Option<String> = row.get(18)?;
        let language_str: String = row.get(19)?;

        Ok(MemoryItem {
            memory_id: row.get(0)?,
            user_id: row.get(1)?,
            org_id: row.get(2)?,
            tier: parse_tier(&tier_str)?,
            status: parse_status(&status_str)?,
            text: row.get(5)?,
            summary: row.get(6)?,
            tags: serde_json::from_str(&tags_json).map_err(|e| to_storage_err(e.to_string()))?,
            entities: serde_json::from_str(&entities_json)
                .map_err(|e| to_storage_err(e.to_string()))?,
            source: serde_json::from_str(&source_json).map_err(|e| to_storage_err(e.to_string()))?,
            quality: serde_json::from_str(&quality_json)
                .map_err(|e| to_storage_err(e.to_string()))?,
            stats: serde_json::from_str(&stats_json).map_err(|e| to_storage_err(e.to_string()))?,
            created_at: parse_dt(&created_at)?,
            updated_at: parse_dt(&updated_at)?,
            archived_at: archived_at.as_deref().map(parse_dt).transpose()?,
            expires_at: expires_at.as_deref().map(parse_dt).transpose()?,
            embedding: embedding_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(|e| to_storage_err(e.to_string()))?,
            versioning: serde_json::from_str(&versioning_json)
                .map_err(|e| to_storage_err(e.to_string()))?,
            personality: personality_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(|e| to_storage_err(e.to_string()))?,
            language: parse_language(&language_str),
            always_inject: row.get::<_, i64>(20)? != 0,
            needs_reindex: row.get::<_, i64>(21)? != 0,
            reindex_reason: row.get(22)?,
            sanitized_backup: row.get(23)?,
        })
    })())
}
