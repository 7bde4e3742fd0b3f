//! Property tests for the layout table and column redistribution

use folio_document::{
    create_block, create_section, redistribute_columns, BlockKind, IdGenerator, LayoutName,
    Section,
};
use proptest::prelude::*;

fn layout_strategy() -> impl Strategy<Value = LayoutName> {
    prop::sample::select(LayoutName::ALL.to_vec())
}

fn kind_strategy() -> impl Strategy<Value = BlockKind> {
    prop::sample::select(BlockKind::ALL.to_vec())
}

/// A section of `layout` with a random number of blocks in each column
fn populated_section(
    layout: LayoutName,
    per_column: &[Vec<BlockKind>],
    ids: &mut IdGenerator,
) -> Section {
    let mut section = create_section(layout, ids);
    for (column, kinds) in section.columns.iter_mut().zip(per_column) {
        for kind in kinds {
            column.blocks.push(create_block(*kind, ids));
        }
    }
    section
}

fn flat_ids(section: &Section) -> Vec<String> {
    section
        .columns
        .iter()
        .flat_map(|c| c.blocks.iter().map(|b| b.id().to_string()))
        .collect()
}

proptest! {
    #[test]
    fn redistribution_never_loses_blocks(
        from in layout_strategy(),
        to in layout_strategy(),
        per_column in prop::collection::vec(prop::collection::vec(kind_strategy(), 0..4), 4),
    ) {
        let mut ids = IdGenerator::new();
        let section = populated_section(from, &per_column, &mut ids);
        let before = flat_ids(&section);
        let old_columns = section.columns.clone();

        let mut changed = section.clone();
        changed.columns = redistribute_columns(section.columns, to, &mut ids);
        changed.layout = to;

        // Document order is preserved, which is stronger than multiset equality.
        prop_assert_eq!(flat_ids(&changed), before);
        prop_assert!(changed.validate().is_ok());

        let kept = to.column_count().min(old_columns.len());
        for i in 0..kept {
            prop_assert_eq!(&changed.columns[i].id, &old_columns[i].id);
        }

        if to.column_count() < old_columns.len() {
            let last = to.column_count() - 1;
            let expected: Vec<String> = old_columns[last..]
                .iter()
                .flat_map(|c| c.blocks.iter().map(|b| b.id().to_string()))
                .collect();
            let actual: Vec<String> = changed.columns[last]
                .blocks
                .iter()
                .map(|b| b.id().to_string())
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn created_sections_match_layout_table(layout in layout_strategy()) {
        let mut ids = IdGenerator::new();
        let section = create_section(layout, &mut ids);
        prop_assert_eq!(section.columns.len(), layout.column_count());
        prop_assert!(section.validate().is_ok());
    }
}
