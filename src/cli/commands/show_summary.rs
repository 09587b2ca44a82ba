use crate::services::persistence::{read_summary, SummaryRow};
use anyhow::Result;
use std::path::Path;

/// モジュールごとの集計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTally {
    pub module: String,
    pub files: usize,
    pub failures: usize,
}

/// 出現順を保ってモジュールごとに件数を数える
pub fn tally(rows: &[SummaryRow]) -> Vec<ModuleTally> {
    let mut tallies: Vec<ModuleTally> = Vec::new();
    for row in rows {
        let index = match tallies.iter().position(|t| t.module == row.module) {
            Some(index) => index,
            None => {
                tallies.push(ModuleTally {
                    module: row.module.clone(),
                    files: 0,
                    failures: 0,
                });
                tallies.len() - 1
            }
        };
        tallies[index].files += 1;
        if row.status == "Failed" {
            tallies[index].failures += 1;
        }
    }
    tallies
}

/// サマリーCSVを読み戻して表示
pub fn execute_show_summary(path: &Path) -> Result<()> {
    let rows = read_summary(path)?;
    let tallies = tally(&rows);

    println!("📄 サマリー: {}", path.display());
    for t in &tallies {
        println!("   - {}: {} files, {} failures", t.module, t.files, t.failures);
    }

    let failures: Vec<&SummaryRow> = rows.iter().filter(|r| r.status == "Failed").collect();
    println!(
        "📊 合計: {} files, {} failures",
        rows.len(),
        failures.len()
    );
    if !failures.is_empty() {
        println!("❌ 失敗したファイル:");
        for row in failures {
            println!("   - [{}] {}: {}", row.module, row.file, row.reason);
        }
    }
    Ok(())
}
