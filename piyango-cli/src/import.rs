use std::path::Path;

use anyhow::Result;
use tracing::info;

use piyango_db::status::UpdateStatus;
use piyango_db::store::{load_history, merge_draws, read_new_draws, save_history, HISTORY_FILE};

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
    pub total_draws: usize,
}

/// Fusionne `file` dans l'historique puis horodate la mise à jour.
pub fn import_csv(history: &Path, status: &Path, file: &Path) -> Result<ImportResult> {
    let (new_draws, errors) = read_new_draws(file)?;
    let old_draws = if history.exists() {
        load_history(history)?
    } else {
        Vec::new()
    };

    let read = new_draws.len() as u32;
    let merged = merge_draws(old_draws, new_draws);
    save_history(history, &merged.draws)?;

    let mut update_status = UpdateStatus::load_or_init(status)?;
    update_status.touch(HISTORY_FILE);
    update_status.save(status)?;

    info!(inserted = merged.inserted, skipped = merged.skipped, errors, "import terminé");

    Ok(ImportResult {
        total_records: read + errors,
        inserted: merged.inserted,
        skipped: merged.skipped,
        errors,
        total_draws: merged.draws.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use piyango_db::status::NEVER_UPDATED;

    const NEW_DRAWS: &str = "\
game,year,month,month_idx,draw_nr,numbers
on-numara,2024,Haziran,6,101,\"[1, 5, 9, 13, 17, 21, 25, 29, 33, 37, 41, 45, 49, 53, 57, 61, 65, 69, 73, 77, 80, 2]\"
on-numara,2024,Haziran,6,102,\"[3, 6]\"
on-numara,2024,Haziran,6,102,\"[3, 6]\"
on-numara,2024,Haziran,6,103,bozuk
";

    #[test]
    fn test_import_creates_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let history = dir.path().join("loto.csv");
        let status = dir.path().join("status.json");
        let file = dir.path().join("new.csv");
        std::fs::write(&file, NEW_DRAWS).unwrap();

        let result = import_csv(&history, &status, &file).unwrap();
        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(result.total_draws, 2);

        let again = import_csv(&history, &status, &file).unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.skipped, 3);
        assert_eq!(load_history(&history).unwrap().len(), 2);

        let stamped = UpdateStatus::load_or_init(&status).unwrap();
        assert_ne!(stamped.last_update(HISTORY_FILE), NEVER_UPDATED);
    }
}
