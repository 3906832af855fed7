use std::path::Path;

use super::*;
use crate::corpus::CorpusSnapshot;
use crate::parse::PhpParser;

fn analyze(source: &str) -> Vec<Issue> {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(source).unwrap();
    let corpus = CorpusSnapshot::default();
    let ctx = FileContext {
        path: Path::new("app/Service.php"),
        source,
        tree: &tree,
        corpus: &corpus,
    };
    DuplicationAnalyzer::new(5, 0.85).analyze(&ctx).unwrap()
}

fn of_kind<'a>(issues: &'a [Issue], kind: &str) -> Vec<&'a Issue> {
    issues.iter().filter(|i| i.kind == kind).collect()
}

const TWIN_METHODS: &str = "<?php
class OrderService {
    public function calculateTotal($items) {
        $total = 0;
        foreach ($items as $item) {
            $total += $item->price;
        }
        return $total + 10;
    }

    public function calculateBonus($orders) {
        $sum = 0;
        foreach ($orders as $order) {
            $sum += $order->price;
        }
        return $sum + 20;
    }
}
";

#[test]
fn renamed_twin_methods_are_flagged() {
    let issues = analyze(TWIN_METHODS);
    let dups = of_kind(&issues, "duplicate_method");
    assert_eq!(dups.len(), 1);

    let issue = dups[0];
    assert_eq!(issue.severity, Severity::Major);
    assert!(issue.message.contains("calculateTotal"));
    assert!(issue.message.contains("calculateBonus"));

    let info = issue.refactor_info.as_ref().unwrap();
    let similarity = info["similarity"].as_f64().unwrap();
    assert!(similarity >= 0.85);
}

#[test]
fn short_getters_are_never_flagged() {
    // One 3-line getter repeated ten times: below the candidate minimum.
    let mut source = String::from("<?php\nclass Bag {\n");
    for i in 0..10 {
        source.push_str(&format!(
            "    public function get{i}() {{\n        return $this->value;\n    }}\n"
        ));
    }
    source.push_str("}\n");

    let issues = analyze(&source);
    assert!(issues.is_empty());
}

#[test]
fn unrelated_methods_are_not_flagged() {
    let source = "<?php
class Mixed {
    public function render($view) {
        $html = $this->layout($view);
        $html .= $this->footer();
        $this->cache->store($view, $html);
        $this->log->debug('rendered');
        return $html;
    }

    public function destroy($id) {
        $record = $this->repository->find($id);
        if ($record === null) {
            throw new NotFoundException($id);
        }
        $this->repository->delete($record);
        $this->events->dispatch('deleted');
    }
}
";
    let issues = analyze(source);
    assert!(of_kind(&issues, "duplicate_method").is_empty());
}

#[test]
fn duplicate_blocks_report_both_ranges() {
    let issues = analyze(TWIN_METHODS);
    let blocks = of_kind(&issues, "duplicate_code_block");
    // The twin method bodies are also twin compound statements.
    assert!(!blocks.is_empty());
    let info = blocks[0].refactor_info.as_ref().unwrap();
    assert!(info.contains_key("block1Lines"));
    assert!(info.contains_key("block2Lines"));
}

#[test]
fn overlapping_blocks_are_not_compared() {
    // A block and the same block nested one level deeper overlap; the
    // only reported pairs must have disjoint line ranges.
    let issues = analyze(TWIN_METHODS);
    for issue in of_kind(&issues, "duplicate_code_block") {
        let info = issue.refactor_info.as_ref().unwrap();
        let parse_range = |key: &str| -> (usize, usize) {
            let text = info[key].as_str().unwrap();
            let (start, end) = text.split_once('-').unwrap();
            (start.parse().unwrap(), end.parse().unwrap())
        };
        let (s1, e1) = parse_range("block1Lines");
        let (s2, e2) = parse_range("block2Lines");
        assert!(e1 < s2 || e2 < s1, "overlapping pair reported: {s1}-{e1} vs {s2}-{e2}");
    }
}

#[test]
fn route_file_is_not_duplication() {
    let source = "<?php
Route::prefix('admin')->middleware('auth')->group(function () {
    Route::get('/users', [UserController::class, 'index']);
    Route::get('/posts', [PostController::class, 'index']);
    Route::get('/tags', [TagController::class, 'index']);
    Route::get('/roles', [RoleController::class, 'index']);
});

Route::prefix('api')->middleware('token')->group(function () {
    Route::get('/orders', [OrderController::class, 'index']);
    Route::get('/invoices', [InvoiceController::class, 'index']);
    Route::get('/payments', [PaymentController::class, 'index']);
    Route::get('/refunds', [RefundController::class, 'index']);
});
";
    let issues = analyze(source);
    assert!(of_kind(&issues, "duplicate_code_block").is_empty());
}

#[test]
fn boilerplate_shapes_are_recognized() {
    assert!(is_boilerplate(
        "Route::prefix('admin')->group(function () { Route::get('/u', 'c'); });"
    ));
    assert!(is_boilerplate(
        "Schema::create('users', function ($table) { $table->id(); });"
    ));
    assert!(is_boilerplate("['driver' => 'mysql', 'host' => 'localhost']"));
    assert!(!is_boilerplate("$total += $item->price;"));
    assert!(!is_boilerplate("Route::get('/users', 'UserController');"));
}

#[test]
fn below_threshold_similarity_is_quiet() {
    let source = "<?php
class Calc {
    public function up($items) {
        $total = 0;
        foreach ($items as $item) {
            $total += $item->price;
        }
        return $total;
    }

    public function down($names) {
        $out = [];
        if ($names !== null) {
            $out = array_map('strtolower', $names);
        }
        sort($out);
        return implode(',', $out);
    }
}
";
    let issues = analyze(source);
    assert!(of_kind(&issues, "duplicate_method").is_empty());
}
