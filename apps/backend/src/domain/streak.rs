use time::OffsetDateTime;

/// Daily streak after a play at `now`, given the previous streak and last play instant.
///
/// Same UTC day keeps the streak (at least 1), the previous day extends it,
/// any longer gap restarts it at 1.
pub fn next_streak(
    previous: u32,
    last_played_at: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> u32 {
    let today = now.date();
    match last_played_at.map(|t| t.date()) {
        Some(last) if last >= today => previous.max(1),
        Some(last) if last.next_day() == Some(today) => previous.saturating_add(1),
        _ => 1,
    }
}
