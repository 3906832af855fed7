//! Security heuristics: SQL injection, XSS, mass assignment, dangerous
//! functions, password handling, CSRF.
//!
//! These are pattern heuristics, not taint analysis; they flag shapes
//! that are risky by default and stay quiet when the code already shows
//! the safe variant (parameter binding, hashing, validation).

use std::error::Error;
use std::sync::LazyLock;

use regex::Regex;

use crate::issue::{Issue, Severity};
use crate::parse::{call_name, is_function_like, kind_of, line_range, node_text, walk_tree, NodeKind};
use crate::pipeline::{Analyzer, FileContext};

const DANGEROUS_FUNCTIONS: &[&str] = &[
    "eval",
    "exec",
    "shell_exec",
    "system",
    "passthru",
    "unserialize",
];

const SUPERGLOBALS: &[&str] = &["$_GET", "$_POST", "$_REQUEST", "$_ENV", "$_SERVER", "$_FILES"];

static DB_RAW_INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"DB::raw\s*\(\s*["'][^"']*\$[^"']*["']"#).expect("db raw regex")
});
static DB_RAW_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DB::raw\s*\([^,]+,\s*\[").expect("db raw binding regex"));
static RAW_METHOD_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(whereRaw|selectRaw)\s*\(\s*["'][^"']*\$[^"']*["']"#).expect("raw var regex")
});
static RAW_METHOD_CONCAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(whereRaw|selectRaw)\s*\([^)]*\.").expect("raw concat regex"));
static RAW_METHOD_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(whereRaw|selectRaw)\s*\([^,]+,\s*\[").expect("raw binding regex"));
static QUERY_INTERPOLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"query\s*\(\s*["'].*\$.*["']\s*\)"#).expect("query regex"));

pub struct SecurityAnalyzer;

impl SecurityAnalyzer {
    pub fn new() -> Self {
        SecurityAnalyzer
    }

    fn check_method(&self, ctx: &FileContext<'_>, text: &str, line: usize, end_line: usize, issues: &mut Vec<Issue>) {
        self.check_sql_injection(ctx, text, line, end_line, issues);
        self.check_xss(ctx, text, line, end_line, issues);
        self.check_passwords(ctx, text, line, end_line, issues);
    }

    fn check_sql_injection(
        &self,
        ctx: &FileContext<'_>,
        text: &str,
        line: usize,
        end_line: usize,
        issues: &mut Vec<Issue>,
    ) {
        if text.contains("DB::raw")
            && DB_RAW_INTERPOLATION.is_match(text)
            && !DB_RAW_BINDING.is_match(text)
        {
            issues.push(
                Issue::new(
                    "sql_injection_risk",
                    Severity::Critical,
                    "Potential SQL Injection: DB::raw() with string interpolation",
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion(
                    "Use parameter binding: DB::raw(\"query WHERE id = ?\", [$id]) or use Query Builder methods",
                ),
            );
        }

        if (text.contains("whereRaw") || text.contains("selectRaw"))
            && (RAW_METHOD_VARIABLE.is_match(text) || RAW_METHOD_CONCAT.is_match(text))
            && !RAW_METHOD_BINDING.is_match(text)
        {
            issues.push(
                Issue::new(
                    "sql_injection_risk",
                    Severity::Critical,
                    "Potential SQL Injection: Raw query methods with variables",
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion(
                    "Use parameter binding with ? placeholders and pass variables as second argument",
                ),
            );
        }

        if QUERY_INTERPOLATION.is_match(text) {
            issues.push(
                Issue::new(
                    "sql_injection_risk",
                    Severity::Critical,
                    "Potential SQL Injection: String concatenation in query",
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion("Never concatenate user input into SQL queries. Use parameter binding"),
            );
        }
    }

    fn check_xss(
        &self,
        ctx: &FileContext<'_>,
        text: &str,
        line: usize,
        end_line: usize,
        issues: &mut Vec<Issue>,
    ) {
        if text.contains("{!!") && !text.contains("csrf") {
            issues.push(
                Issue::new(
                    "xss_vulnerability",
                    Severity::Critical,
                    "Potential XSS: Unescaped output with {!! !!}",
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion("Use {{ }} for automatic escaping unless you explicitly trust the content"),
            );
        }

        let raw_request_input = text.contains("$request->input")
            || text.contains("$request->all()")
            || text.contains("$request->get(")
            || text.contains("$request->post(")
            || text.contains("$request->query(");
        if text.contains("response()->json") && raw_request_input {
            issues.push(
                Issue::new(
                    "xss_risk",
                    Severity::Major,
                    "User input directly in JSON response without validation",
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion(
                    "Validate and sanitize user input before outputting, use Resources for API responses",
                ),
            );
        }
    }

    fn check_passwords(
        &self,
        ctx: &FileContext<'_>,
        text: &str,
        line: usize,
        end_line: usize,
        issues: &mut Vec<Issue>,
    ) {
        let mentions_password = text.contains("password") || text.contains("pwd");
        let assigns_password = text.contains("= $request->")
            || text.contains("= $_POST")
            || text.contains("= $_GET")
            || text.contains("->password =")
            || text.contains("['password'] =");
        let hashes = text.contains("password_hash")
            || text.contains("Hash::make")
            || text.contains("bcrypt(")
            || text.contains("Hash::check");

        if mentions_password && assigns_password && !hashes {
            issues.push(
                Issue::new(
                    "password_not_hashed",
                    Severity::Critical,
                    "Password stored without hashing",
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion("Use Hash::make($password) or bcrypt($password) to hash passwords"),
            );
        }

        if text.contains("md5") || text.contains("sha1") {
            issues.push(
                Issue::new(
                    "weak_hashing",
                    Severity::Major,
                    "Using weak hashing algorithm (md5/sha1)",
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion("Use bcrypt or Hash::make() for password hashing"),
            );
        }
    }

    fn check_calls(&self, ctx: &FileContext<'_>, issues: &mut Vec<Issue>) {
        walk_tree(ctx.tree.root_node(), &mut |node| {
            if kind_of(&node) != NodeKind::FunctionCall {
                return;
            }
            let Some(name) = call_name(&node, ctx.source) else {
                return;
            };
            let (line, end_line) = line_range(&node);

            if DANGEROUS_FUNCTIONS.contains(&name) {
                issues.push(
                    Issue::new(
                        "dangerous_function",
                        Severity::Critical,
                        format!("Dangerous function {name}() can lead to code execution vulnerabilities"),
                        ctx.path,
                        line,
                    )
                    .with_end_line(line)
                    .with_suggestion(format!(
                        "Avoid using {name}(). If absolutely necessary, sanitize all inputs rigorously"
                    )),
                );
            }

            if name == "extract" {
                let text = node_text(&node, ctx.source);
                let has_superglobal = SUPERGLOBALS.iter().any(|sg| text.contains(sg));
                let message = if has_superglobal {
                    "Using extract() with superglobals can overwrite variables"
                } else {
                    "Using extract() is dangerous and can cause security issues"
                };
                issues.push(
                    Issue::new("dangerous_extract", Severity::Major, message, ctx.path, line)
                        .with_end_line(end_line)
                        .with_suggestion("Avoid extract() or use EXTR_SKIP flag and never with user input"),
                );
            }
        });
    }

    fn check_mass_assignment(&self, ctx: &FileContext<'_>, issues: &mut Vec<Issue>) {
        let code = ctx.source;
        let is_model = code.contains("extends Model") || code.contains("use HasFactory");
        if !is_model {
            return;
        }

        if !code.contains("$fillable") && !code.contains("$guarded") {
            issues.push(
                Issue::new(
                    "mass_assignment_vulnerability",
                    Severity::Critical,
                    "Model without $fillable or $guarded protection",
                    ctx.path,
                    1,
                )
                .with_suggestion("Add protected $fillable = [...] to prevent mass assignment vulnerabilities"),
            );
        }

        if code.contains("$guarded = []") {
            issues.push(
                Issue::new(
                    "mass_assignment_risk",
                    Severity::Major,
                    "Model with empty $guarded allows mass assignment of all fields",
                    ctx.path,
                    1,
                )
                .with_suggestion("Use $fillable with explicit field list instead of empty $guarded"),
            );
        }

        if code.contains("::create($request->all())") || code.contains("::update($request->all())") {
            issues.push(
                Issue::new(
                    "mass_assignment_risk",
                    Severity::Critical,
                    "Using $request->all() for mass assignment without validation",
                    ctx.path,
                    1,
                )
                .with_suggestion("Use validated data: Model::create($request->validated())"),
            );
        }
    }

    fn check_csrf(&self, ctx: &FileContext<'_>, issues: &mut Vec<Issue>) {
        let in_views = ctx.path.to_string_lossy().contains("views/");
        if in_views && ctx.source.contains("<form") && !ctx.source.contains("@csrf") {
            issues.push(
                Issue::new(
                    "missing_csrf",
                    Severity::Critical,
                    "Form without @csrf token",
                    ctx.path,
                    1,
                )
                .with_suggestion("Add @csrf directive inside all forms for CSRF protection"),
            );
        }
    }
}

impl Analyzer for SecurityAnalyzer {
    fn name(&self) -> &'static str {
        "security"
    }

    fn analyze(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, Box<dyn Error>> {
        let mut issues = Vec::new();

        walk_tree(ctx.tree.root_node(), &mut |node| {
            if !is_function_like(&node) {
                return;
            }
            let text = node_text(&node, ctx.source);
            let (line, end_line) = line_range(&node);
            self.check_method(ctx, text, line, end_line, &mut issues);
        });

        self.check_calls(ctx, &mut issues);
        self.check_mass_assignment(ctx, &mut issues);
        self.check_csrf(ctx, &mut issues);

        Ok(issues)
    }
}

#[cfg(test)]
#[path = "security_test.rs"]
mod tests;
