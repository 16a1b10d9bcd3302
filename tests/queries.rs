//! Scenario tests for the matcher/axis query surface, exercised the way the
//! transformation layer uses it: find blocks of interest along an axis,
//! resolve nearest-enclosing metadata, rewrite in place.

use wikidom::query::matcher::{
    AnyMatcher, KindMatcher, MacroMatcher, MetadataMatcher, OrMatcher,
};
use wikidom::syntax::{MetaData, Syntax};
use wikidom::tree::{BlockKind, BlockType, Xdom};
use wikidom::{Axis, BlockId};

/// root → paragraph → group → word, with a macro sibling.
struct Doc {
    dom: Xdom,
    paragraph: BlockId,
    group: BlockId,
    word: BlockId,
    toc: BlockId,
}

fn doc() -> Doc {
    let mut dom = Xdom::new();
    let root = dom.root();
    let paragraph = dom.create_block(BlockKind::Paragraph);
    let toc = dom.create_block(BlockKind::Macro {
        id: "toc".to_string(),
        content: None,
        inline: false,
    });
    dom.add_children(root, &[paragraph, toc]).unwrap();
    let group = dom.create_block(BlockKind::Group);
    dom.add_child(paragraph, group).unwrap();
    let word = dom.create_block(BlockKind::word("deep"));
    dom.add_child(group, word).unwrap();
    Doc {
        dom,
        paragraph,
        group,
        word,
        toc,
    }
}

#[test]
fn get_blocks_on_ancestor_axis_is_nearest_first() {
    let d = doc();
    assert_eq!(
        d.dom.get_blocks(d.word, &AnyMatcher, Axis::Ancestor),
        vec![d.group, d.paragraph, d.dom.root()]
    );
}

#[test]
fn get_first_block_on_ancestor_axis() {
    let d = doc();
    assert_eq!(
        d.dom.get_first_block(d.word, &AnyMatcher, Axis::Ancestor),
        Some(d.group)
    );
    assert_eq!(
        d.dom
            .get_first_block(d.word, &KindMatcher(BlockType::Paragraph), Axis::Ancestor),
        Some(d.paragraph)
    );
    assert_eq!(
        d.dom
            .get_first_block(d.word, &KindMatcher(BlockType::Image), Axis::Ancestor),
        None
    );
}

#[test]
fn or_matcher_over_descendants() {
    let d = doc();
    let matcher = OrMatcher::new(vec![
        Box::new(KindMatcher(BlockType::Group)),
        Box::new(KindMatcher(BlockType::Macro)),
    ]);
    assert_eq!(
        d.dom.get_blocks(d.dom.root(), &matcher, Axis::Descendant),
        vec![d.group, d.toc]
    );
}

#[test]
fn macro_matcher_finds_invocations_to_rewrite() {
    let d = doc();
    let matches = d
        .dom
        .get_blocks(d.dom.root(), &MacroMatcher::named("toc"), Axis::DescendantOrSelf);
    assert_eq!(matches, vec![d.toc]);
    assert!(d
        .dom
        .get_blocks(d.dom.root(), &MacroMatcher::named("code"), Axis::DescendantOrSelf)
        .is_empty());
}

#[test]
fn macro_rewrite_roundtrip() {
    // the typical macro-expansion shape: find the macro, replace it with the
    // blocks it produced
    let mut d = doc();
    let root = d.dom.root();
    let expanded = d.dom.create_block(BlockKind::Group);
    let text = d.dom.create_block(BlockKind::word("expanded"));
    d.dom.add_child(expanded, text).unwrap();

    let target = d
        .dom
        .get_first_block(root, &MacroMatcher::any(), Axis::Descendant)
        .unwrap();
    d.dom.replace_child(root, &[expanded], target).unwrap();

    assert_eq!(
        d.dom.children(root).collect::<Vec<_>>(),
        vec![d.paragraph, expanded]
    );
    assert_eq!(d.dom.parent(d.toc), None);
}

#[test]
fn metadata_scopes_shadow_nearest_first() {
    let mut dom = Xdom::new();
    let root = dom.root();
    let scope_a = dom.create_block(BlockKind::MetaData {
        metadata: MetaData::with(MetaData::SYNTAX, "xwiki/2.1"),
    });
    let scope_b = dom.create_block(BlockKind::MetaData {
        metadata: MetaData::with(MetaData::SYNTAX, "plain/1.0"),
    });
    let leaf = dom.create_block(BlockKind::word("leaf"));
    dom.add_child(root, scope_a).unwrap();
    dom.add_child(scope_a, scope_b).unwrap();
    dom.add_child(scope_b, leaf).unwrap();

    // nearest scope wins for the leaf
    assert_eq!(dom.syntax_metadata(leaf), Some(Syntax::new("plain", "1.0")));
    // a lookup on scope A itself resolves to A's own value
    assert_eq!(
        dom.syntax_metadata(scope_a),
        Some(Syntax::new("xwiki", "2.1"))
    );

    // the matcher view of the same search
    assert_eq!(
        dom.get_first_block(leaf, &MetadataMatcher::new(MetaData::SYNTAX), Axis::AncestorOrSelf),
        Some(scope_b)
    );
}

#[test]
fn get_walks_axis_lazily_for_first_value() {
    let d = doc();
    // extract the first ancestor-or-self block type
    let first = d.dom.get(
        d.word,
        |dom, block| Some(dom.kind(block).block_type()),
        Axis::AncestorOrSelf,
    );
    assert_eq!(first, Some(BlockType::Word));
}
