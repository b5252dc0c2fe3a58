use padrino_catalog::{
    catalog::CatalogDocument,
    cli::{self, CliArgs, OutputFormat},
    extractor::{padrino::PadrinoExtractor, CatalogExtractor},
    ordering::sort_routes,
    parser::AstParser,
    record::{HandlerVerb, NameStyle, RouteVerb},
    registry::Registry,
    scanner::FileScanner,
    serializer::{serialize_json, serialize_yaml},
    stats::StatsReporter,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn blog_project() -> TempDir {
    create_test_project(vec![
        ("admin/app.rb", include_str!("fixtures/admin_app.rb")),
        ("app/app.rb", include_str!("fixtures/blog_app.rb")),
        ("app/controllers/posts.rb", include_str!("fixtures/posts_controller.rb")),
        ("vendor/bundle/padrino/core.rb", "module Padrino\n  class Application\n    get \"/vendored\"\n  end\nend\n"),
    ])
}

fn extract_project(temp_dir: &TempDir) -> Registry {
    let scan_result = FileScanner::new(temp_dir.path().to_path_buf())
        .scan()
        .expect("Failed to scan directory");
    let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.ruby_files)
        .into_iter()
        .filter_map(Result::ok)
        .collect();
    assert_eq!(parsed_files.len(), 3, "vendor tree should be skipped");

    let mut registry = Registry::new();
    for file in &parsed_files {
        PadrinoExtractor
            .extract(file, &mut registry)
            .expect("Failed to extract declarations");
    }
    registry
}

fn route_names(registry: &Registry, namespace: &str) -> Vec<String> {
    let mut routes: Vec<_> = registry.routes_in(namespace).collect();
    sort_routes(&mut routes);
    routes
        .iter()
        .map(|r| format!("{} {}", r.controller().unwrap_or("-"), r.display_name()))
        .collect()
}

#[test]
fn test_end_to_end_namespaces() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);

    let paths: Vec<&str> = registry.namespaces().iter().map(|n| n.path.as_str()).collect();
    assert_eq!(paths, vec!["", "Admin", "Admin::App", "Blog", "Blog::App"]);
    assert!(registry.namespace("Padrino::Application").is_none());
}

#[test]
fn test_routes_follow_controllers_across_files() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);

    assert_eq!(
        route_names(&registry, "Blog::App"),
        vec![
            "- GET \"/\"",
            "posts DELETE \"/posts/:id\"",
            "posts POST :create",
            "posts GET :index",
            "posts GET :show",
        ]
    );
}

#[test]
fn test_nested_controller_restores_outer_controller() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);

    assert_eq!(
        route_names(&registry, "Admin::App"),
        vec![
            "- GET \"/\"",
            "accounts GET :edit",
            "accounts GET :index",
            "sessions GET :new",
        ]
    );
}

#[test]
fn test_route_identifiers_and_conditions() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);

    let index = registry
        .routes_in("Blog::App")
        .find(|r| r.identifier() == "GET_posts_index")
        .expect("GET :index should be registered");
    assert_eq!(index.path(), "Blog::App#GET_posts_index");
    assert_eq!(index.docstring(), "Lists all posts");
    assert_eq!(index.tags().len(), 1);
    assert_eq!(index.tags()[0].name.as_deref(), Some(":provides"));
    assert_eq!(index.tags()[0].text, "+[:html, :json]+");

    let create = registry
        .routes_in("Blog::App")
        .find(|r| r.verb() == RouteVerb::Post)
        .expect("POST :create should be registered");
    assert_eq!(create.name(NameStyle::Identifier, false), "POST_posts_create");
    assert_eq!(create.tags()[0].name.as_deref(), Some(":csrf_protection"));
    assert_eq!(create.tags()[0].text, "+false+");

    let delete = registry
        .routes_in("Blog::App")
        .find(|r| r.verb() == RouteVerb::Delete)
        .expect("DELETE should be registered");
    assert_eq!(delete.identifier(), "DELETE_posts__posts__id");
    assert!(delete.tags().is_empty());
}

#[test]
fn test_handlers_get_serials_in_scan_order() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);

    let identifiers: Vec<&str> = registry.handlers().iter().map(|h| h.identifier()).collect();
    assert_eq!(
        identifiers,
        vec!["after#0", "before#1", "before#2", "error_404#3", "before_posts_show_edit#4"]
    );

    let hook = &registry.handlers()[4];
    assert_eq!(hook.verb(), HandlerVerb::Before);
    assert_eq!(hook.controller(), Some("posts"));
    assert_eq!(hook.display_name(), "before :show, :edit");

    let reopened = &registry.handlers()[1];
    assert_eq!(reopened.namespace(), "Admin::App");
    assert_eq!(reopened.controller(), None);
}

#[test]
fn test_duplicate_and_dynamic_routes_are_skipped() {
    let code = include_str!("fixtures/admin_app.rb");
    let parsed = AstParser::parse_source(code, "admin/app.rb".into()).expect("Failed to parse");
    let mut registry = Registry::new();
    let summary = PadrinoExtractor
        .extract(&parsed, &mut registry)
        .expect("Failed to extract declarations");

    assert_eq!(summary.routes, 4);
    assert_eq!(summary.handlers, 2);
    assert_eq!(summary.skipped, 2);

    let root = registry
        .routes_in("Admin::App")
        .find(|r| r.identifier() == "GET__")
        .expect("GET / should be registered");
    assert!(root.source().contains("redirect"), "first declaration wins");
}

#[test]
fn test_catalog_document_yaml() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);
    let document = CatalogDocument::build(&registry, &StatsReporter::with_padrino());

    assert_eq!(document.route_count(), 9);
    assert_eq!(document.handler_count(), 5);

    let yaml = serialize_yaml(&document).expect("Failed to serialize to YAML");
    assert!(yaml.contains("namespace: Admin::App"));
    assert!(yaml.contains("namespace: Blog::App"));
    assert!(yaml.contains("group: Padrino Routings"));
    assert!(yaml.contains("group: Padrino Handlers"));
    assert!(yaml.contains("label: Conditions"));
    assert!(yaml.contains("docstring: Landing page"));
}

#[test]
fn test_catalog_document_json() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);
    let document = CatalogDocument::build(&registry, &StatsReporter::with_padrino());

    let json = serialize_json(&document).expect("Failed to serialize to JSON");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");

    let blog = &parsed["namespaces"][1];
    assert_eq!(blog["namespace"], "Blog::App");
    assert_eq!(blog["routes"][1]["controller"], "posts");
    assert_eq!(blog["routes"][1]["entries"][0]["verb"], "DELETE");
    assert_eq!(blog["routes"][1]["entries"][2]["conditions"][0]["name"], ":provides");
    assert_eq!(blog["handlers"][0]["entries"][0]["identifier"], "before#2");
    assert_eq!(blog["handlers"][0]["entries"][1]["identifier"], "error_404#3");

    assert_eq!(parsed["statistics"][0]["name"], "P) Handlers");
    assert_eq!(parsed["statistics"][0]["total"], 5);
    assert_eq!(parsed["statistics"][1]["undocumented"], 6);
}

#[test]
fn test_statistics_table() {
    let temp_dir = blog_project();
    let registry = extract_project(&temp_dir);

    assert_eq!(
        StatsReporter::with_padrino().render(&registry),
        "P) Handlers:               5 (    5 undocumented)\n\
         P) Routes:                 9 (    6 undocumented)"
    );
}

#[test]
fn test_cli_run_writes_yaml() {
    let temp_dir = blog_project();
    let output = temp_dir.path().join("doc/catalog.yaml");

    let args = CliArgs {
        project_path: temp_dir.path().to_path_buf(),
        output_format: OutputFormat::Yaml,
        output_path: Some(output.clone()),
        stats: false,
        verbose: false,
    };
    cli::run(cli::parse_args_from_parsed(args).expect("Invalid arguments")).expect("Run failed");

    let written = std::fs::read_to_string(&output).expect("Output file missing");
    assert!(written.starts_with("namespaces:"));
    assert!(written.contains("identifier: GET_posts_show"));
}

#[test]
fn test_empty_project_handling() {
    let temp_dir = create_test_project(vec![("README.md", "# empty")]);

    let scan_result = FileScanner::new(temp_dir.path().to_path_buf())
        .scan()
        .expect("Failed to scan directory");
    assert!(scan_result.ruby_files.is_empty());

    assert!(cli::build_registry(temp_dir.path()).is_err());
}

#[test]
fn test_plain_script_declares_nothing() {
    let temp_dir = create_test_project(vec![(
        "script.rb",
        "require 'sinatra'\n\nget \"/\" do\n  \"hi\"\nend\n\nbefore do\nend\n",
    )]);

    let (registry, summary) = cli::build_registry(temp_dir.path()).expect("Run failed");
    assert_eq!(summary.routes + summary.handlers + summary.skipped, 0);
    assert!(registry.routes().is_empty());
    assert!(registry.handlers().is_empty());
}
