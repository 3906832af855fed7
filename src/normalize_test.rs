use super::*;

#[test]
fn folds_variables() {
    assert_eq!(normalize("$total += $item;"), "$VAR += $VAR;");
}

#[test]
fn folds_string_literals() {
    assert_eq!(normalize("echo 'hello';"), "echo 'STRING';");
    assert_eq!(normalize("echo \"hello $name\";"), "echo \"STRING\";");
}

#[test]
fn folds_numbers() {
    assert_eq!(normalize("$x = 42 + 1000;"), "$VAR = NUM + NUM;");
}

#[test]
fn strips_comments() {
    let code = "$x = 1; // increment\n/* block\ncomment */\n$y = 2;";
    assert_eq!(normalize(code), "$VAR = NUM; $VAR = NUM;");
}

#[test]
fn collapses_whitespace() {
    assert_eq!(normalize("if  (true)\n\n{\n    return;\n}"), "if (true) { return; }");
}

#[test]
fn renamed_bodies_normalize_identically() {
    let a = "foreach ($items as $item) { $total += $item->price * 10; }";
    let b = "foreach ($orders as $order) { $sum += $order->price * 20; }";
    assert_eq!(normalize(a), normalize(b));
}

#[test]
fn structural_difference_survives() {
    let a = normalize("if ($x) { return $x; }");
    let b = normalize("while ($x) { return $x; }");
    assert_ne!(a, b);
}

#[test]
fn tokenize_splits_on_whitespace() {
    assert_eq!(tokenize("$VAR = NUM ;"), vec!["$VAR", "=", "NUM", ";"]);
}

#[test]
fn tokenize_drops_comment_markers() {
    assert_eq!(tokenize("a // b /* c * d"), vec!["a", "b", "c", "d"]);
}

#[test]
fn tokenize_empty() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("   ").is_empty());
}

#[test]
fn tokenize_is_deterministic() {
    let input = normalize("$a = foo($b, 'x', 3);");
    assert_eq!(tokenize(&input), tokenize(&input));
}
