use crate::config::Config;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use folio_document::{ContentBlock, IdGenerator, PageContent};
use folio_editor::{LoadedPage, PageStore};
use folio_migrate::migrate_html_to_blocks;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Page slug
    pub slug: String,

    /// Print the document as JSON instead of an outline
    #[arg(long)]
    pub json: bool,
}

pub async fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.store(cwd);

    let (page, legacy) = match store.load(&args.slug).await? {
        LoadedPage::Document(page) => (page, false),
        LoadedPage::LegacyHtml(html) => (migrate_html_to_blocks(&html, &mut IdGenerator::new()), true),
        LoadedPage::Empty => bail!("No page named {} in {}", args.slug, store.dir().display()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        println!("{} {}", "📄".bright_blue(), args.slug.bright_white().bold());
        if legacy {
            println!("   {}", "legacy HTML, migrated in memory".yellow());
        }
        for line in outline(&page) {
            println!("{}", line);
        }
        println!();
    }

    match page.validate() {
        Ok(()) => {
            if !args.json {
                println!("{} {}", "✓".green(), "Valid".green());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            bail!("Page {} failed validation", args.slug)
        }
    }
}

/// Indented tree of sections, columns and blocks
pub fn outline(page: &PageContent) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, section) in page.sections.iter().enumerate() {
        lines.push(format!("  section {} [{}] {}", index + 1, section.layout, section.id));
        for column in &section.columns {
            lines.push(format!("    column {}% {}", column.width_percent, column.id));
            for block in &column.blocks {
                lines.push(format!("      {:<6} {}{}", block.kind(), block.id(), detail(block)));
            }
        }
    }
    lines
}

fn detail(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Image(image) if !image.src.is_empty() => format!(" src={}", image.src),
        ContentBlock::Video(video) if !video.src.is_empty() => format!(" src={}", video.src),
        ContentBlock::Spacer(spacer) => format!(" {}px", spacer.height),
        ContentBlock::Text(html) | ContentBlock::Table(html) | ContentBlock::Code(html) => {
            format!(" ({} bytes)", html.content_html.len())
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_document::{create_section, LayoutName};

    #[test]
    fn test_outline_lists_every_node() {
        let mut ids = IdGenerator::from_seed("inspect");
        let mut section = create_section(LayoutName::SeventyThirty, &mut ids);
        section.columns[1].blocks.push(ContentBlock::spacer(&mut ids));
        let page = PageContent::new(vec![section]);

        let lines = outline(&page);

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("  section 1 [70-30]"));
        assert!(lines[1].starts_with("    column 70%"));
        assert!(lines[2].starts_with("    column 30%"));
        assert!(lines[3].trim_start().starts_with("spacer"));
        assert!(lines[3].ends_with(" 48px"));
    }

    #[tokio::test]
    async fn test_inspect_missing_page_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let result = inspect(
            InspectArgs {
                slug: "nothing".to_string(),
                json: false,
            },
            &cwd,
        )
        .await;
        assert!(result.is_err());
    }
}
