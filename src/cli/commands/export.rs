use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportRequest};
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        kind,
        format,
        file,
        range,
        id,
        force,
    } = cmd
    {
        let mut pool = open_pool(cfg)?;
        let req = ExportRequest {
            kind: *kind,
            format: *format,
            file: file.clone(),
            range: range.clone(),
            id: *id,
            force: *force,
            today: date::today(),
        };
        ExportLogic::export(&mut pool, &req)?;
    }
    Ok(())
}
