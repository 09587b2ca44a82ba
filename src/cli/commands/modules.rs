use crate::cli::Cli;
use anyhow::Result;

/// 登録済みモジュールと入力パスを一覧表示
pub fn execute_modules(cli: &Cli) -> Result<()> {
    let registry = cli.registry();
    let profile = cli.profile(&registry)?;

    println!("📦 登録済みモジュール: {}個", registry.len());
    for spec in &profile.modules {
        let marker = if registry.contains(&spec.name) { "  " } else { "❓" };
        match spec.input() {
            Some(input) => println!("{marker} {} → {}", spec.name, input.display()),
            None => println!("{marker} {} → (入力未設定)", spec.name),
        }
    }

    match &profile.output_root {
        Some(output_root) if !output_root.as_os_str().is_empty() => {
            println!("📂 出力先: {}", output_root.display())
        }
        _ => println!("📂 出力先: (未設定)"),
    }
    Ok(())
}
