use anyhow::Result;
use comfy_table::Table;
use lexdec_session::{FileStorage, SessionStore, Summary};
use std::path::PathBuf;

pub fn execute(session_dir: PathBuf) -> Result<()> {
    let store = SessionStore::new(FileStorage::new(session_dir));
    let Some(trials) = store.load().filter(|t| !t.is_empty()) else {
        println!("No results found");
        return Ok(());
    };

    let mut per_trial = Table::new();
    per_trial.set_header(vec!["#", "Item", "Real word", "Answer", "Correct", "RT (ms)"]);
    let yes_no = |b: bool| if b { "yes" } else { "no" }.to_string();
    for (i, t) in trials.iter().enumerate() {
        per_trial.add_row(vec![
            (i + 1).to_string(),
            t.item.clone(),
            yes_no(t.is_word),
            yes_no(t.answer),
            yes_no(t.correct),
            t.rt_ms.to_string(),
        ]);
    }
    println!("{per_trial}");

    let summary = Summary::from_trials(&trials);
    let mut table = Table::new();
    table.set_header(vec!["Trials", "Correct", "Accuracy", "Average RT"]);
    table.add_row(vec![
        summary.trials.to_string(),
        summary.correct.to_string(),
        format!("{}%", summary.accuracy),
        format!("{} ms", summary.avg_rt_ms),
    ]);
    println!("{table}");
    println!("Risk band: coming soon");
    println!("This task is not a diagnosis.");
    Ok(())
}
