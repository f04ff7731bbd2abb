//! Tests for ChartService

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use headcount::application::services::ChartService;
use headcount::application::ApplicationError;
use headcount::domain::{DomainError, Headcount, RenderStyle, ReportFormat};
use headcount::infrastructure::traits::{FileSystem, RealFileSystem};

const NESTED_CHART: &str = r#"
[[unit]]
name = "p"
label = "Parent"
kind = "composite"
count = 30

[[unit]]
name = "sales"
label = "Sales"
count = 300
parent = "p"

[[unit]]
name = "dev"
label = "Development"
count = 500
parent = "p"

[[unit]]
name = "q"
label = "Q"
kind = "composite"
count = 10
parent = "p"
"#;

/// In-memory filesystem that records writes
#[derive(Default)]
struct MockFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MockFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.exists(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn service_with(fs: MockFileSystem) -> ChartService {
    ChartService::new(Arc::new(fs))
}

// ============================================================
// load / report / total
// ============================================================

#[test]
fn given_nested_chart_when_reporting_flat_then_q_precedes_final_total() {
    let service = service_with(MockFileSystem::with_file("chart.toml", NESTED_CHART));

    let report = service
        .report(Path::new("chart.toml"), &ReportFormat::default(), RenderStyle::Flat)
        .unwrap();

    assert_eq!(
        report,
        "Parent Department\n\
         Sales Department: 300\n\
         Development Department: 500\n\
         Q Department\n\
         Total Employees: 10\n\
         Total Employees: 840"
    );
}

#[test]
fn given_chart_when_reporting_tree_then_root_line_has_total_and_own() {
    let service = service_with(MockFileSystem::with_file("chart.toml", NESTED_CHART));

    let report = service
        .report(Path::new("chart.toml"), &ReportFormat::default(), RenderStyle::Tree)
        .unwrap();

    assert_eq!(report.lines().next(), Some("Parent Department: 840 (own 30)"));
    assert_eq!(report.lines().count(), 4);
}

#[test]
fn given_chart_when_totalling_then_returns_chart_or_unit_total() {
    let service = service_with(MockFileSystem::with_file("chart.toml", NESTED_CHART));
    let path = Path::new("chart.toml");

    assert_eq!(service.total(path, None).unwrap(), Headcount::new(840));
    assert_eq!(service.total(path, Some("Sales")).unwrap(), Headcount::new(300));
    assert_eq!(service.total(path, Some("Q")).unwrap(), Headcount::new(10));
}

#[test]
fn given_unknown_unit_when_totalling_then_domain_error() {
    let service = service_with(MockFileSystem::with_file("chart.toml", NESTED_CHART));

    let err = service
        .total(Path::new("chart.toml"), Some("Marketing"))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::UnknownUnit(ref name)) if name == "Marketing"
    ));
}

#[test]
fn given_label_shared_by_two_units_when_totalling_then_ambiguous_but_name_resolves() {
    let chart = format!(
        "{}\n[[unit]]\nname = \"q-sales\"\nlabel = \"Sales\"\ncount = 7\nparent = \"q\"\n",
        NESTED_CHART
    );
    let service = service_with(MockFileSystem::with_file("chart.toml", &chart));
    let path = Path::new("chart.toml");

    let err = service.total(path, Some("Sales")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::AmbiguousUnit { matches: 2, .. })
    ));
    assert_eq!(service.total(path, Some("sales")).unwrap(), Headcount::new(300));
    assert_eq!(service.total(path, Some("q-sales")).unwrap(), Headcount::new(7));
    assert_eq!(service.total(path, Some("q")).unwrap(), Headcount::new(17));
}

#[test]
fn given_missing_file_when_loading_then_chart_not_found() {
    let service = service_with(MockFileSystem::default());

    let err = service.load(Path::new("missing.toml")).unwrap_err();

    assert!(matches!(err, ApplicationError::ChartNotFound(_)));
}

#[test]
fn given_invalid_chart_when_loading_then_domain_error() {
    let service = service_with(MockFileSystem::with_file(
        "chart.toml",
        "[[unit]]\nname = \"a\"\ncount = -1\n",
    ));

    let err = service.load(Path::new("chart.toml")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidArgument(_))
    ));
}

// ============================================================
// init
// ============================================================

#[test]
fn given_new_path_when_init_then_writes_loadable_sample() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("org").join("chart.toml");
    let service = ChartService::new(Arc::new(RealFileSystem));

    service.init(&path, false).unwrap();

    assert!(path.is_file());
    assert_eq!(service.total(&path, None).unwrap(), Headcount::new(830));
}

#[test]
fn given_existing_file_when_init_without_force_then_refuses() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("chart.toml");
    std::fs::write(&path, "# mine\n").unwrap();
    let service = ChartService::new(Arc::new(RealFileSystem));

    let err = service.init(&path, false).unwrap_err();

    assert!(matches!(err, ApplicationError::ChartExists(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
}

#[test]
fn given_existing_file_when_init_with_force_then_overwrites() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("chart.toml");
    std::fs::write(&path, "# mine\n").unwrap();
    let service = ChartService::new(Arc::new(RealFileSystem));

    service.init(&path, true).unwrap();

    assert_eq!(service.total(&path, Some("Development")).unwrap(), Headcount::new(500));
}

// ============================================================
// demo / render
// ============================================================

#[test]
fn given_demo_when_rendered_then_matches_reference_output() {
    let demo = ChartService::demo().unwrap();

    assert_eq!(demo.total_count(), Headcount::new(830));
    assert_eq!(
        demo.to_string(),
        "Parent Department\nSales Department: 300\nDevelopment Department: 500\nTotal Employees: 830"
    );
}

#[test]
fn given_multiple_roots_when_rendering_then_separated_by_blank_line() {
    let roots = vec![
        headcount::domain::Unit::leaf("A", Headcount::new(1)),
        headcount::domain::Unit::leaf("B", Headcount::new(2)),
    ];

    let text = ChartService::render(&roots, &ReportFormat::default(), RenderStyle::Flat);

    assert_eq!(text, "A Department: 1\n\nB Department: 2");
}
