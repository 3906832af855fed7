use std::path::Path;

use super::*;
use crate::corpus::CorpusSnapshot;
use crate::parse::PhpParser;

fn analyze(source: &str) -> Vec<Issue> {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(source).unwrap();
    let corpus = CorpusSnapshot::default();
    let ctx = FileContext {
        path: Path::new("app/Http/Controllers/OrderController.php"),
        source,
        tree: &tree,
        corpus: &corpus,
    };
    NPlusOneDetector::new().analyze(&ctx).unwrap()
}

fn kinds(issues: &[Issue]) -> Vec<&str> {
    issues.iter().map(|i| i.kind.as_str()).collect()
}

#[test]
fn relationship_in_loop_without_eager_loading() {
    let source = "<?php
class OrderController {
    public function index() {
        $orders = Order::query()->limit(50)->get();
        foreach ($orders as $order) {
            echo $order->customer->email;
        }
    }
}
";
    let issues = analyze(source);
    assert!(kinds(&issues).contains(&"n_plus_one_query"));
    let issue = issues.iter().find(|i| i.kind == "n_plus_one_query").unwrap();
    assert_eq!(issue.severity, Severity::Critical);
    assert!(issue.message.contains("index"));
    let info = issue.refactor_info.as_ref().unwrap();
    assert_eq!(info["pattern"], "loop_with_relationship");
}

#[test]
fn eager_loaded_loop_is_fine() {
    let source = "<?php
class OrderController {
    public function index() {
        $orders = Order::with('customer')->limit(50)->get();
        foreach ($orders as $order) {
            echo $order->customer->email;
        }
    }
}
";
    let issues = analyze(source);
    assert!(!kinds(&issues).contains(&"n_plus_one_query"));
    assert!(!kinds(&issues).contains(&"missing_eager_loading"));
}

#[test]
fn query_inside_loop_is_critical() {
    let source = "<?php
class OrderController {
    public function refresh($ids) {
        foreach ($ids as $id) {
            $order = Order::find($id);
            $order->touch();
        }
    }
}
";
    let issues = analyze(source);
    assert!(kinds(&issues).contains(&"query_in_loop"));
}

#[test]
fn query_before_loop_is_fine() {
    let source = "<?php
class OrderController {
    public function refresh($ids) {
        $orders = Order::with('customer')->get();
        foreach ($orders as $order) {
            $order->touch();
        }
    }
}
";
    let issues = analyze(source);
    assert!(!kinds(&issues).contains(&"query_in_loop"));
}

#[test]
fn collection_passed_to_view_without_eager_loading() {
    let source = "<?php
class OrderController {
    public function index() {
        $orders = Order::all();
        return view('orders.index', ['orders' => $orders]);
    }
}
";
    let issues = analyze(source);
    assert!(kinds(&issues).contains(&"n_plus_one_blade"));
}

#[test]
fn plain_attribute_access_is_not_a_relationship() {
    let source = "<?php
class OrderController {
    public function names($orders) {
        $names = [];
        foreach ($orders as $order) {
            $names[] = $order->name;
        }
        return $names;
    }
}
";
    let issues = analyze(source);
    assert!(!kinds(&issues).contains(&"n_plus_one_query"));
}

#[test]
fn method_calls_in_loop_are_not_relationships() {
    let source = "<?php
class OrderController {
    public function totals($orders) {
        $sum = 0;
        foreach ($orders as $order) {
            $sum += $order->total();
        }
        return $sum;
    }
}
";
    let issues = analyze(source);
    assert!(!kinds(&issues).contains(&"n_plus_one_query"));
}
