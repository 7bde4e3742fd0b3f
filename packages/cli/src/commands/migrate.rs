use crate::config::Config;
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use colored::Colorize;
use folio_document::{BlockKind, IdGenerator, PageContent};
use folio_editor::{LoadedPage, PageStore};
use folio_migrate::migrate_html_to_blocks;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Legacy HTML file
    pub input: PathBuf,

    /// Page slug (defaults to the input file name)
    #[arg(short, long)]
    pub slug: Option<String>,

    /// Replace an existing page
    #[arg(short, long)]
    pub force: bool,
}

pub async fn migrate(args: MigrateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.store(cwd);

    let input = PathBuf::from(cwd).join(&args.input);
    let html = fs::read_to_string(&input)
        .with_context(|| format!("Cannot read {}", input.display()))?;

    let slug = match args.slug {
        Some(slug) => slug,
        None => input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot derive a slug from {}", input.display()))?,
    };

    if !args.force && matches!(store.load(&slug).await?, LoadedPage::Document(_)) {
        bail!("Page {} already exists (use --force to replace it)", slug);
    }

    println!("{}", "🔁 Migrating legacy page...".bright_blue().bold());

    let mut ids = IdGenerator::new();
    let page = migrate_html_to_blocks(&html, &mut ids);
    page.validate()?;
    store.save(&slug, &page).await?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        args.input.display(),
        store.record_path(&slug).display()
    );
    println!();
    for line in summary(&page) {
        println!("  {}", line);
    }

    Ok(())
}

/// Section total plus one line per block kind that occurs
pub fn summary(page: &PageContent) -> Vec<String> {
    let mut lines = vec![format!("{} sections", page.sections.len())];
    for kind in BlockKind::ALL {
        let count = page.count_blocks(kind);
        if count > 0 {
            lines.push(format!("{} {} block(s)", count, kind));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_stores_document_under_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(
            dir.path().join("about.html"),
            "<h1>About</h1><table><tr><td>1</td></tr></table><p>Bye</p>",
        )
        .unwrap();

        migrate(
            MigrateArgs {
                input: PathBuf::from("about.html"),
                slug: None,
                force: false,
            },
            &cwd,
        )
        .await
        .unwrap();

        let store = Config::default().store(&cwd);
        let page = match store.load("about").await.unwrap() {
            LoadedPage::Document(page) => page,
            other => panic!("expected document, got {:?}", other),
        };
        assert_eq!(
            summary(&page),
            vec!["3 sections", "2 text block(s)", "1 table block(s)"]
        );
    }
}
