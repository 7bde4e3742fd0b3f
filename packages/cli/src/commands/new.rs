use crate::config::Config;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use folio_document::{create_section, IdGenerator, LayoutName, PageContent};
use folio_editor::{LoadedPage, PageStore};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Page slug (file name without extension)
    pub slug: String,

    /// Layout of the first section
    #[arg(short, long, default_value = "100")]
    pub layout: LayoutName,

    /// Replace an existing page
    #[arg(short, long)]
    pub force: bool,
}

pub async fn new_page(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.store(cwd);

    if !args.force && store.load(&args.slug).await? != LoadedPage::Empty {
        bail!("Page {} already exists (use --force to replace it)", args.slug);
    }

    let mut ids = IdGenerator::new();
    let page = PageContent::new(vec![create_section(args.layout, &mut ids)]);
    store.save(&args.slug, &page).await?;

    println!(
        "  {} Created {} with a {} section",
        "✓".green(),
        store.record_path(&args.slug).display(),
        args.layout.as_str().bright_white()
    );

    Ok(())
}
