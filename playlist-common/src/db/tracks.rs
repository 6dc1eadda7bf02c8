//! Track table queries
//!
//! CRUD operations used by the service layer. The playback engine never
//! calls these; handlers keep the store and the in-memory playlist in step.

use crate::{Error, Result, Track};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

/// Convert a duration for the INTEGER column
fn stored_duration(duration_seconds: u64) -> Result<i64> {
    i64::try_from(duration_seconds)
        .map_err(|_| Error::InvalidInput("duration too large".to_string()))
}

fn track_from_row(row: &SqliteRow) -> Track {
    Track {
        id: row.get("id"),
        title: row.get("title"),
        duration_seconds: row.get::<i64, _>("duration_seconds").max(0) as u64,
    }
}

/// Append a track after the last stored one
pub async fn insert_track(db: &SqlitePool, track: &Track) -> Result<()> {
    let duration = stored_duration(track.duration_seconds)?;
    sqlx::query(
        r#"
        INSERT INTO tracks (id, title, duration_seconds, position)
        VALUES (?, ?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM tracks))
        "#,
    )
    .bind(&track.id)
    .bind(&track.title)
    .bind(duration)
    .execute(db)
    .await?;

    Ok(())
}

/// Get a single track by id
pub async fn get_track(db: &SqlitePool, id: &str) -> Result<Track> {
    let row = sqlx::query("SELECT id, title, duration_seconds FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| Error::NotFound(format!("track {}", id)))?;

    Ok(track_from_row(&row))
}

/// Get all tracks in playlist order
pub async fn list_tracks(db: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(
        "SELECT id, title, duration_seconds FROM tracks ORDER BY position ASC",
    )
    .fetch_all(db)
    .await?;

    Ok(rows.iter().map(track_from_row).collect())
}

/// Replace title and duration of an existing track
///
/// The stored position is left alone.
pub async fn update_track(
    db: &SqlitePool,
    id: &str,
    title: &str,
    duration_seconds: u64,
) -> Result<Track> {
    let duration = stored_duration(duration_seconds)?;
    let result = sqlx::query("UPDATE tracks SET title = ?, duration_seconds = ? WHERE id = ?")
        .bind(title)
        .bind(duration)
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("track {}", id)));
    }

    Ok(Track::new(id, title, duration_seconds))
}

/// Delete a track by id
pub async fn delete_track(db: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("track {}", id)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let pool = init_memory_database().await.unwrap();
        for (id, title) in [("c", "third?"), ("a", "first?"), ("b", "second?")] {
            insert_track(&pool, &Track::new(id, title, 10)).await.unwrap();
        }

        let ids: Vec<String> = list_tracks(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_get_missing_track_is_not_found() {
        let pool = init_memory_database().await.unwrap();
        assert!(matches!(get_track(&pool, "uuid").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let pool = init_memory_database().await.unwrap();
        let track = Track::new("dup", "Take Five", 325);
        insert_track(&pool, &track).await.unwrap();
        assert!(matches!(
            insert_track(&pool, &track).await,
            Err(Error::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_duration_is_invalid_input() {
        let pool = init_memory_database().await.unwrap();
        assert!(matches!(
            insert_track(&pool, &Track::new("big", "big", u64::MAX)).await,
            Err(Error::InvalidInput(_))
        ));

        insert_track(&pool, &Track::new("1", "one", 1)).await.unwrap();
        assert!(matches!(
            update_track(&pool, "1", "one", u64::MAX).await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(get_track(&pool, "1").await.unwrap().duration_seconds, 1);
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let pool = init_memory_database().await.unwrap();
        insert_track(&pool, &Track::new("1", "one", 1)).await.unwrap();
        insert_track(&pool, &Track::new("2", "two", 2)).await.unwrap();

        let updated = update_track(&pool, "1", "Blue Rondo A La Turk", 405).await.unwrap();
        assert_eq!(updated, Track::new("1", "Blue Rondo A La Turk", 405));

        let tracks = list_tracks(&pool).await.unwrap();
        assert_eq!(tracks[0], updated);
        assert_eq!(tracks[1].id, "2");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_track() {
        let pool = init_memory_database().await.unwrap();
        assert!(matches!(
            update_track(&pool, "invalid", "x", 1).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(delete_track(&pool, "invalid").await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let pool = init_memory_database().await.unwrap();
        insert_track(&pool, &Track::new("1", "one", 1)).await.unwrap();
        delete_track(&pool, "1").await.unwrap();
        assert!(list_tracks(&pool).await.unwrap().is_empty());
    }
}
