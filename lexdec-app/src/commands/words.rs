use anyhow::{Context, Result};
use comfy_table::Table;
use lexdec_core::{default_word_list, load_word_list};
use std::path::PathBuf;

pub fn execute(words: Option<PathBuf>) -> Result<()> {
    let list = match &words {
        Some(path) => load_word_list(path)
            .with_context(|| format!("cannot use word list {}", path.display()))?,
        None => default_word_list(),
    };

    let mut table = Table::new();
    table.set_header(vec!["#", "Item", "Real word"]);
    for (i, stimulus) in list.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            stimulus.text.clone(),
            if stimulus.is_word { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{table}");

    let real = list.iter().filter(|s| s.is_word).count();
    println!(
        "{} stimuli ({} words, {} non-words)",
        list.len(),
        real,
        list.len() - real
    );
    Ok(())
}
