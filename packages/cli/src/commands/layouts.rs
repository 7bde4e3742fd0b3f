use anyhow::Result;
use colored::Colorize;
use folio_document::LayoutName;

pub fn layouts() -> Result<()> {
    println!("{}", "Section layouts".bright_blue().bold());
    for layout in LayoutName::ALL {
        let widths: Vec<String> = layout.widths().iter().map(|w| format!("{}%", w)).collect();
        println!(
            "  {} {} column(s): {}",
            format!("{:<12}", layout.as_str()).bright_white(),
            layout.column_count(),
            widths.join(", ")
        );
    }
    Ok(())
}
