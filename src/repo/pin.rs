use rusqlite::Connection;
use chrono::NaiveDate;
use anyhow::{Context, Result};
use thiserror::Error;
use crate::models::{PinType, UserPin};
use crate::repo::KvRepo;

/// Fixed key the pin list is stored under
pub const PIN_STORAGE_KEY: &str = "recruitment_simulation_pins";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinRepoError {
    #[error("Pin id prefix '{prefix}' is ambiguous ({matches} matches)")]
    AmbiguousPrefix { prefix: String, matches: usize },
}

/// Pin repository
///
/// The whole pin list is stored as one JSON array
/// (`[{ id, type, date, endDate? }]`) under [`PIN_STORAGE_KEY`]. Every mutation
/// loads the list, changes it and writes it back immediately. Stored entries that
/// no longer deserialize are left out of [`PinRepo::load`] but written back
/// unchanged after the readable pins; only [`PinRepo::clear`] discards them.
///
/// # Example
///
/// ```no_run
/// use rivalcal::db::DbConnection;
/// use rivalcal::repo::PinRepo;
/// use rivalcal::models::PinType;
/// use chrono::NaiveDate;
///
/// let conn = DbConnection::connect_in_memory().unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let pin = PinRepo::add(&conn, PinType::DocumentSubmission, date, None).unwrap();
/// assert_eq!(PinRepo::load(&conn).unwrap(), vec![pin]);
/// ```
pub struct PinRepo;

impl PinRepo {
    /// Load all pins. Dates are rebuilt from their ISO strings; entries that no
    /// longer deserialize are skipped.
    pub fn load(conn: &Connection) -> Result<Vec<UserPin>> {
        Ok(Self::read_entries(conn)?.0)
    }

    /// Replace the stored list of readable pins
    pub fn save(conn: &Connection, pins: &[UserPin]) -> Result<()> {
        let (_, unreadable) = Self::read_entries(conn)?;
        Self::write_entries(conn, pins, &unreadable)
    }

    /// Readable pins plus the raw entries that failed to deserialize
    fn read_entries(conn: &Connection) -> Result<(Vec<UserPin>, Vec<serde_json::Value>)> {
        let raw = match KvRepo::get(conn, PIN_STORAGE_KEY)? {
            Some(raw) => raw,
            None => return Ok((Vec::new(), Vec::new())),
        };

        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .context("Failed to parse stored pins: expected a JSON array")?;

        let mut pins = Vec::with_capacity(values.len());
        let mut unreadable = Vec::new();
        for value in values {
            match serde_json::from_value::<UserPin>(value.clone()) {
                Ok(pin) => pins.push(pin),
                Err(e) => {
                    log::warn!("Skipping unreadable stored pin: {}", e);
                    unreadable.push(value);
                }
            }
        }
        Ok((pins, unreadable))
    }

    fn write_entries(conn: &Connection, pins: &[UserPin], unreadable: &[serde_json::Value]) -> Result<()> {
        let mut values = pins
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to serialize pins")?;
        values.extend(unreadable.iter().cloned());

        let json = serde_json::to_string(&values).context("Failed to serialize pins")?;
        KvRepo::put(conn, PIN_STORAGE_KEY, &json)
    }

    /// Append a new pin and persist it
    pub fn add(
        conn: &Connection,
        pin_type: PinType,
        date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<UserPin> {
        if let Some(end) = end_date {
            if end < date {
                anyhow::bail!("Pin end date {} is before its start date {}", end, date);
            }
        }

        let pin = UserPin::new(pin_type, date, end_date);
        let (mut pins, unreadable) = Self::read_entries(conn)?;
        pins.push(pin.clone());
        Self::write_entries(conn, &pins, &unreadable)?;

        log::info!("Added {} pin {} ({}..{})", pin_type, pin.id, date, pin.window().end);
        Ok(pin)
    }

    /// Remove the pin whose id equals `id_or_prefix`, or the single pin whose id
    /// starts with it. Returns the removed pin, or `None` when nothing matched. A
    /// prefix shared by several pins fails with [`PinRepoError::AmbiguousPrefix`].
    pub fn remove(conn: &Connection, id_or_prefix: &str) -> Result<Option<UserPin>> {
        let (mut pins, unreadable) = Self::read_entries(conn)?;

        let position = match pins.iter().position(|p| p.id == id_or_prefix) {
            Some(pos) => Some(pos),
            None => {
                let matches: Vec<usize> = pins
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !id_or_prefix.is_empty() && p.id.starts_with(id_or_prefix))
                    .map(|(i, _)| i)
                    .collect();
                if matches.len() > 1 {
                    return Err(PinRepoError::AmbiguousPrefix {
                        prefix: id_or_prefix.to_string(),
                        matches: matches.len(),
                    }
                    .into());
                }
                matches.first().copied()
            }
        };

        let removed = match position {
            Some(pos) => pins.remove(pos),
            None => return Ok(None),
        };
        Self::write_entries(conn, &pins, &unreadable)?;

        log::info!("Removed pin {}", removed.id);
        Ok(Some(removed))
    }

    /// Remove every pin, unreadable entries included; returns how many readable
    /// pins there were
    pub fn clear(conn: &Connection) -> Result<usize> {
        let count = Self::load(conn)?.len();
        Self::write_entries(conn, &[], &[])?;
        log::info!("Cleared {} pins", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_add_load_roundtrip() {
        let conn = DbConnection::connect_in_memory().unwrap();
        assert!(PinRepo::load(&conn).unwrap().is_empty());

        let a = PinRepo::add(&conn, PinType::DocumentSubmission, d(1), Some(d(3))).unwrap();
        let b = PinRepo::add(&conn, PinType::Interview2, d(20), None).unwrap();

        let pins = PinRepo::load(&conn).unwrap();
        assert_eq!(pins, vec![a, b]);
    }

    #[test]
    fn test_add_rejects_reversed_window() {
        let conn = DbConnection::connect_in_memory().unwrap();
        assert!(PinRepo::add(&conn, PinType::AptitudeTest, d(5), Some(d(4))).is_err());
        assert!(PinRepo::load(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_remove_by_id_and_prefix() {
        let conn = DbConnection::connect_in_memory().unwrap();
        PinRepo::save(
            &conn,
            &[
                UserPin { id: "abc-1".to_string(), pin_type: PinType::Interview1, date: d(1), end_date: None },
                UserPin { id: "abc-2".to_string(), pin_type: PinType::Interview2, date: d(2), end_date: None },
                UserPin { id: "xyz".to_string(), pin_type: PinType::Interview3, date: d(3), end_date: None },
            ],
        )
        .unwrap();

        let err = PinRepo::remove(&conn, "abc").unwrap_err();
        assert_eq!(
            err.downcast_ref::<PinRepoError>(),
            Some(&PinRepoError::AmbiguousPrefix { prefix: "abc".to_string(), matches: 2 })
        );
        assert_eq!(PinRepo::remove(&conn, "nope").unwrap(), None);

        let removed = PinRepo::remove(&conn, "abc-2").unwrap().unwrap();
        assert_eq!(removed.pin_type, PinType::Interview2);

        let removed = PinRepo::remove(&conn, "xy").unwrap().unwrap();
        assert_eq!(removed.id, "xyz");

        let remaining = PinRepo::load(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "abc-1");
    }

    #[test]
    fn test_clear() {
        let conn = DbConnection::connect_in_memory().unwrap();
        PinRepo::add(&conn, PinType::Interview1, d(1), None).unwrap();
        PinRepo::add(&conn, PinType::Interview1, d(2), None).unwrap();
        assert_eq!(PinRepo::clear(&conn).unwrap(), 2);
        assert!(PinRepo::load(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_load_rebuilds_dates_and_skips_garbage() {
        let conn = DbConnection::connect_in_memory().unwrap();
        KvRepo::put(
            &conn,
            PIN_STORAGE_KEY,
            r#"[
                {"id":"1","type":"document","date":"2026-03-01T00:00:00.000Z","endDate":"2026-03-03T00:00:00.000Z"},
                {"id":"2","type":"mystery","date":"2026-03-01"},
                {"id":"3","type":"interview1","date":"garbage"}
            ]"#,
        )
        .unwrap();

        let pins = PinRepo::load(&conn).unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].date, d(1));
        assert_eq!(pins[0].end_date, Some(d(3)));
    }

    #[test]
    fn test_mutations_keep_unreadable_entries() {
        let conn = DbConnection::connect_in_memory().unwrap();
        KvRepo::put(
            &conn,
            PIN_STORAGE_KEY,
            r#"[{"id":"1","type":"document","date":"2026-03-01"},{"id":"2","type":"mystery","date":"2026-03-01"}]"#,
        )
        .unwrap();

        let added = PinRepo::add(&conn, PinType::Interview1, d(9), None).unwrap();
        assert_eq!(PinRepo::load(&conn).unwrap().len(), 2);
        PinRepo::remove(&conn, "1").unwrap().unwrap();

        let raw = KvRepo::get(&conn, PIN_STORAGE_KEY).unwrap().unwrap();
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["id"], added.id.as_str());
        assert_eq!(values[1]["type"], "mystery");

        assert_eq!(PinRepo::clear(&conn).unwrap(), 1);
        assert_eq!(KvRepo::get(&conn, PIN_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_rejects_non_array() {
        let conn = DbConnection::connect_in_memory().unwrap();
        KvRepo::put(&conn, PIN_STORAGE_KEY, r#"{"pins": []}"#).unwrap();
        assert!(PinRepo::load(&conn).is_err());
    }
}
