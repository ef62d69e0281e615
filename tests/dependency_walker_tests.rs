use depconcat::errors::ConcatError;
use depconcat::ignore::IgnorePatterns;
use depconcat::resolver::ResolverConfig;
use depconcat::walker::DependencyWalker;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use tokio::fs;
use tracing_test::traced_test;

async fn write(base: &Path, relative: &str, content: &str) -> PathBuf {
    let path = base.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.unwrap();
    }
    fs::write(&path, content).await.unwrap();
    path
}

fn walker() -> DependencyWalker {
    DependencyWalker::new(ResolverConfig::default(), IgnorePatterns::none()).unwrap()
}

#[tokio::test]
async fn test_sibling_import_and_bare_relative_import() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(base, "main.py", "import helper\nfrom . import utils").await;
    write(base, "helper.py", "def help():\n    return 1\n").await;
    write(base, "utils.py", "def util():\n    return 2\n").await;

    let resolved = walker().walk(&main, base).await.unwrap();

    assert_eq!(resolved, vec![base.join("helper.py"), base.join("utils.py")]);
}

#[tokio::test]
async fn test_acyclic_graph_visits_each_file_once_depth_first() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(base, "main.py", "import left\nimport right\n").await;
    write(base, "left.py", "import shared\n").await;
    write(base, "right.py", "import shared\n").await;
    write(base, "shared.py", "VALUE = 1\n").await;

    let resolved = walker().walk(&main, base).await.unwrap();

    assert_eq!(
        resolved,
        vec![base.join("left.py"), base.join("shared.py"), base.join("right.py")]
    );
}

#[tokio::test]
async fn test_cycle_terminates_with_each_file_once() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let a = write(base, "a.py", "import b\n").await;
    write(base, "b.py", "import a\n").await;

    let resolved = walker().walk(&a, base).await.unwrap();

    assert_eq!(resolved, vec![base.join("b.py")]);
}

#[tokio::test]
async fn test_self_import_is_not_a_dependency() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(base, "main.py", "import main\n").await;

    assert!(walker().walk(&main, base).await.unwrap().is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_unresolvable_candidates_are_dropped_silently() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(
        base,
        "main.py",
        "import does_not_exist\nfrom .nowhere import x\nCONFIG = 'config.yaml'\n",
    )
    .await;

    let resolved = walker().walk(&main, base).await.unwrap();

    assert!(resolved.is_empty());
    assert!(logs_contain("Dropping unresolved candidate"));
}

#[tokio::test]
async fn test_relative_import_ascends_packages() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let module = write(base, "pkg/sub/mod.py", "from ..models import User\n").await;
    write(base, "pkg/models.py", "class User:\n    pass\n").await;

    let resolved = walker().walk(&module, base).await.unwrap();

    assert_eq!(resolved, vec![base.join("pkg/models.py")]);
}

#[tokio::test]
async fn test_package_marker_resolution() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(base, "main.py", "from services import api\n").await;
    write(base, "services/__init__.py", "from .api import serve\n").await;
    write(base, "services/api.py", "def serve():\n    pass\n").await;

    let resolved = walker().walk(&main, base).await.unwrap();

    assert_eq!(
        resolved,
        vec![base.join("services/__init__.py"), base.join("services/api.py")]
    );
}

#[tokio::test]
async fn test_project_root_probing_is_optional() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(base, "app/cli/main.py", "import lib.common\n").await;
    write(base, "lib/common.py", "X = 1\n").await;

    let resolved = walker().walk(&main, base).await.unwrap();
    assert_eq!(resolved, vec![base.join("lib/common.py")]);

    let without_root = DependencyWalker::new(
        ResolverConfig {
            project_root_probing: false,
            ..ResolverConfig::default()
        },
        IgnorePatterns::none(),
    )
    .unwrap();
    assert!(without_root.walk(&main, base).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_secondary_files_follow_nested_references_but_not_imports() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(base, "main.py", "settings = load(\"conf/settings.yaml\")\n").await;
    write(base, "conf/settings.yaml", "extra: 'extra.yaml'\n# import helper\n").await;
    write(base, "conf/extra.yaml", "parent: 'settings.yaml'\n").await;
    write(base, "conf/helper.py", "").await;

    let resolved = walker().walk(&main, base).await.unwrap();

    assert_eq!(
        resolved,
        vec![base.join("conf/settings.yaml"), base.join("conf/extra.yaml")]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_one_file_reached_through_two_spellings_is_visited_once() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    write(base, "real/util.py", "from ..real.main import run\n").await;
    write(base, "real/main.py", "import util\nfrom ..real.util import helper\n").await;
    std::os::unix::fs::symlink(base.join("real"), base.join("link")).unwrap();
    let main = base.join("link/main.py");

    let resolved = walker().walk(&main, base).await.unwrap();

    assert_eq!(resolved, vec![base.join("link/util.py")]);
}

#[tokio::test]
async fn test_ignored_paths_are_neither_included_nor_walked() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let main = write(base, "main.py", "import vendor.thing\nimport app\n").await;
    write(base, "vendor/thing.py", "import app\n").await;
    write(base, "app.py", "").await;

    let walker = DependencyWalker::new(
        ResolverConfig::default(),
        IgnorePatterns::new(Some(vec!["*/vendor/*".to_string()])),
    )
    .unwrap();
    let resolved = walker.walk(&main, base).await.unwrap();

    assert_eq!(resolved, vec![base.join("app.py")]);
}

#[tokio::test]
async fn test_missing_root_file_is_a_read_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.py");

    let result = walker().walk(&missing, dir.path()).await;

    match result {
        Err(ConcatError::FileReadError { path, .. }) => assert!(path.ends_with("missing.py")),
        other => panic!("Expected FileReadError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_primary_extension_is_rejected() {
    let result = DependencyWalker::new(
        ResolverConfig {
            primary_extension: String::new(),
            ..ResolverConfig::default()
        },
        IgnorePatterns::none(),
    );
    assert!(matches!(result, Err(ConcatError::ConfigError(_))));
}
