use super::*;

const VALID: &str = "<?php
class OrderService {
    public function total(array $items): float {
        $sum = 0;
        foreach ($items as $item) {
            $sum += $item->price;
        }
        return $sum;
    }
}
";

#[test]
fn parses_valid_php() {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(VALID).unwrap();
    assert!(!tree.root_node().has_error());
}

#[test]
fn rejects_broken_php() {
    let mut parser = PhpParser::new().unwrap();
    let err = parser.parse("<?php class {{{{ function").unwrap_err();
    assert!(err.to_string().contains("parse error"));
}

#[test]
fn parser_is_reusable_after_failure() {
    let mut parser = PhpParser::new().unwrap();
    assert!(parser.parse("<?php if (((").is_err());
    assert!(parser.parse(VALID).is_ok());
}

#[test]
fn finds_method_declaration() {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(VALID).unwrap();

    let mut methods = Vec::new();
    walk_tree(tree.root_node(), &mut |node| {
        if kind_of(&node) == NodeKind::MethodDeclaration {
            methods.push(declared_name(&node, VALID).unwrap_or("anonymous").to_string());
        }
    });
    assert_eq!(methods, vec!["total"]);
}

#[test]
fn line_range_is_one_based_inclusive() {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(VALID).unwrap();

    let mut range = None;
    walk_tree(tree.root_node(), &mut |node| {
        if kind_of(&node) == NodeKind::MethodDeclaration {
            range = Some(line_range(&node));
        }
    });
    assert_eq!(range, Some((3, 9)));
}

#[test]
fn declared_name_of_class() {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(VALID).unwrap();

    let mut class_name = None;
    walk_tree(tree.root_node(), &mut |node| {
        if kind_of(&node) == NodeKind::ClassDeclaration {
            class_name = declared_name(&node, VALID).map(str::to_string);
        }
    });
    assert_eq!(class_name.as_deref(), Some("OrderService"));
    // The program root has no `name` child.
    assert_eq!(declared_name(&tree.root_node(), VALID), None);
}

#[test]
fn node_text_matches_span() {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(VALID).unwrap();

    let mut found = false;
    walk_tree(tree.root_node(), &mut |node| {
        if kind_of(&node) == NodeKind::ForeachStatement {
            assert!(node_text(&node, VALID).starts_with("foreach"));
            found = true;
        }
    });
    assert!(found);
}

#[test]
fn kind_of_maps_unknown_to_other() {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse("<?php echo 1;").unwrap();
    assert_eq!(kind_of(&tree.root_node()), NodeKind::Other);
}
