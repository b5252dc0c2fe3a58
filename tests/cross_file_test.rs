// Declarations split across files land in one registry
use padrino_catalog::error::Error;
use padrino_catalog::extractor::{padrino::PadrinoExtractor, CatalogExtractor};
use padrino_catalog::parser::AstParser;
use padrino_catalog::registry::Registry;
use std::path::PathBuf;

#[test]
fn test_controllers_reopened_in_another_file() {
    // File 1: application class
    let app_code = r#"
class Shop < Padrino::Application
  get "/" do
  end
end
"#;

    // File 2: controller attached through the class constant
    let controller_code = r#"
Shop.controllers :cart do
  get :show
  after :show do
  end
end

Shop.controllers :cart do
  get :show
end
"#;

    let app = AstParser::parse_source(app_code, PathBuf::from("app.rb")).expect("Failed to parse app");
    let controller = AstParser::parse_source(controller_code, PathBuf::from("controllers/cart.rb"))
        .expect("Failed to parse controller");

    let mut registry = Registry::new();
    let first = PadrinoExtractor.extract(&app, &mut registry).expect("Extraction failed");
    let second = PadrinoExtractor.extract(&controller, &mut registry).expect("Extraction failed");

    assert_eq!(first.routes, 1);
    assert_eq!(second.routes, 1);
    assert_eq!(second.handlers, 1);
    assert_eq!(second.skipped, 1, "the repeated GET :show is a duplicate");

    let paths: Vec<String> = registry.routes().iter().map(|r| r.path()).collect();
    assert_eq!(paths, vec!["Shop#GET__", "Shop#GET_cart_show"]);
    assert_eq!(registry.handlers()[0].path(), "Shop#after_cart_show#0");

    let show = &registry.routes()[1];
    assert_eq!(show.location().file, PathBuf::from("controllers/cart.rb"));
    assert_eq!(show.location().line, 3);
}

#[test]
fn test_failing_file_keeps_earlier_records() {
    let code = r#"
class Good
  get "/ok"
end

class Bad
  Bad.new.controllers :x do
    get :never
  end
end
"#;
    let parsed = AstParser::parse_source(code, PathBuf::from("app.rb")).expect("Failed to parse");
    let mut registry = Registry::new();

    let result = PadrinoExtractor.extract(&parsed, &mut registry);

    assert!(matches!(result, Err(Error::MalformedNamespace { .. })));
    assert_eq!(registry.routes().len(), 1);
    assert_eq!(registry.routes()[0].path(), "Good#GET__ok");
}
