//! End-to-end runs of the scaffold pipeline on a real filesystem.
//!
//! Extensions are "fetched" by copying a fixture directory, and version
//! control calls are recorded instead of executed.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use strata_adapters::{ExportArgsLoader, LocalFilesystem, TemplateRegistry};
use strata_core::{
    application::{
        ApplicationError, ScaffoldService, TreeMerger,
        ports::{ExtensionFetcher, VersionControl},
    },
    domain::{
        Extension, ExtensionRegistry, OverlayOutcome, RenderArgs, ScaffoldOptions, SkipReason,
    },
    error::{StrataError, StrataResult},
};

// ----------------------------------------------------------------------------
// Doubles
// ----------------------------------------------------------------------------

/// Copies `<fixtures>/<flag>` into the checkout directory.
struct FixtureFetcher {
    fixtures: PathBuf,
}

impl ExtensionFetcher for FixtureFetcher {
    fn fetch(&self, extension: &Extension, dest: &Path) -> StrataResult<()> {
        let source = self.fixtures.join(&extension.flag_value);
        if !source.is_dir() {
            return Err(ApplicationError::FetchFailed {
                repository: extension.repository.clone(),
                branch: extension.branch.clone(),
                reason: "fatal: repository not found".into(),
            }
            .into());
        }
        TreeMerger::new(&LocalFilesystem::new()).copy_tree(&source, dest)?;
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingVcs {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingVcs {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl VersionControl for RecordingVcs {
    fn init(&self, _dir: &Path) -> StrataResult<()> {
        self.calls.lock().unwrap().push("init".into());
        Ok(())
    }

    fn create_branch(&self, _dir: &Path, branch: &str) -> StrataResult<()> {
        self.calls.lock().unwrap().push(format!("checkout -b {branch}"));
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------------

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn base_template(root: &Path) {
    write(
        root,
        "package.json",
        r#"{"name":"root","private":true,"workspaces":{"packages":["packages/nextjs"]},"scripts":{"dev":"yarn next:dev"}}"#,
    );
    write(root, "README.md", "# my dapp\n");
    write(root, "CHANGELOG.md", "## 0.1.0\n");
    write(root, ".github/workflows/ci.yml", "on: push\n");
    write(root, "yarn.lock", "# lockfile\n");
    write(
        root,
        "packages/nextjs/package.json",
        r#"{"name":"@app/nextjs","dependencies":{"next":"14.0.0","react":"18.2.0"}}"#,
    );
    write(root, "packages/nextjs/.env.example", "NEXT_PUBLIC_RPC=\n");
    write(
        root,
        "packages/nextjs/foo.template.ts",
        "export const title = \"{{title}}\";\n",
    );
    write(root, "packages/nextjs/public/.gitkeep", "");
    write(root, "packages/nextjs/generated/deployedContracts.ts", "export {};\n");
    write(root, "packages/nextjs/__tests__/page.test.ts", "test();\n");
}

fn foo_extension(root: &Path) {
    write(
        root,
        "package.json",
        r#"{"name":"foo-ext-root","scripts":{"foo:dev":"yarn workspace foo-ext dev"}}"#,
    );
    write(root, "packages/foo-ext/index.ts", "export const foo = 1;\n");
    write(root, "packages/nextjs/foo.args.ts", "export const title = \"X\";\n");
    write(
        root,
        "packages/nextjs/package.json",
        r#"{"name":"ignored","dependencies":{"next":"14.1.0","viem":"2.0.0"}}"#,
    );
    write(root, "packages/hardhat/contracts/Foo.sol", "contract Foo {}\n");
}

fn nested_extension(root: &Path) {
    write(
        root,
        "extensions/package.json",
        r#"{"scripts":{"nested":"echo nested"}}"#,
    );
    write(root, "extensions/packages/nested-ext/index.ts", "export {};\n");
    write(root, "extensions/packages/nextjs/foo.args.ts", r#"{"title": "Nested"}"#);
}

struct Harness {
    _tmp: TempDir,
    base: PathBuf,
    fixtures: PathBuf,
    out: PathBuf,
    vcs: RecordingVcs,
}

impl Harness {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("templates/base");
        let fixtures = tmp.path().join("remote");
        base_template(&base);
        foo_extension(&fixtures.join("foo-ext"));
        nested_extension(&fixtures.join("nested-ext"));
        Self {
            out: tmp.path().join("out"),
            base,
            fixtures,
            vcs: RecordingVcs::default(),
            _tmp: tmp,
        }
    }

    fn registry() -> ExtensionRegistry {
        ExtensionRegistry::new(vec![
            Extension::new("foo-ext", "Foo", "https://example.invalid/foo-ext.git", "main"),
            Extension::new("nested-ext", "Nested", "https://example.invalid/nested.git", "main"),
            Extension::new("gone", "Missing remote", "https://example.invalid/gone.git", "main"),
            Extension::new("foundry-ext", "Foundry", "https://example.invalid/foundry.git", "main"),
            Extension::new("bad-args", "Bad args", "https://example.invalid/bad-args.git", "main"),
            Extension::new("broken-ext", "Broken", "https://example.invalid/broken.git", "main"),
        ])
    }

    fn service(&self, resolver: TemplateRegistry) -> ScaffoldService {
        ScaffoldService::new(
            &self.base,
            Box::new(LocalFilesystem::new()),
            Box::new(FixtureFetcher {
                fixtures: self.fixtures.clone(),
            }),
            Box::new(self.vcs.clone()),
            Box::new(resolver),
            Box::new(ExportArgsLoader::new()),
        )
        .with_registry(Self::registry())
    }

    fn target(&self, name: &str) -> PathBuf {
        self.out.join(name)
    }

    /// Add a file to the remote checkout of `flag`.
    fn remote(&self, flag: &str, rel: &str, content: &str) {
        write(&self.fixtures.join(flag), rel, content);
    }
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn read_json(path: impl AsRef<Path>) -> Value {
    serde_json::from_str(&read(path)).unwrap()
}

/// Relative path -> content for every file under `root`.
fn snapshot(root: &Path) -> BTreeMap<String, String> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            (rel, read(e.path()))
        })
        .collect()
}

fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

fn marker_files(root: &Path) -> Vec<String> {
    snapshot(&root.join("packages"))
        .into_keys()
        .filter(|p| p.contains(".template.") || p.contains(".args."))
        .collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[test]
fn extension_args_render_into_base_template() {
    let h = Harness::new();
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("foo-ext"))
        .unwrap();

    assert_eq!(
        read(target.join("packages/nextjs/foo.ts")),
        "export const title = \"X\";\n"
    );
    assert!(marker_files(&target).is_empty());
    assert_eq!(report.rendered.len(), 1);
    assert_eq!(
        report.rendered[0].args_files[0].to_slash_string(),
        "packages/nextjs/foo.args.ts"
    );
}

#[test]
fn extension_dependencies_win_and_base_keys_survive() {
    let h = Harness::new();
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("foo-ext"))
        .unwrap();

    assert_eq!(
        read_json(target.join("packages/nextjs/package.json")),
        json!({
            "name": "@app/nextjs",
            "dependencies": {"next": "14.1.0", "react": "18.2.0", "viem": "2.0.0"}
        })
    );

    let root = read_json(target.join("package.json"));
    assert_eq!(
        root["workspaces"]["packages"],
        json!(["packages/nextjs", "packages/foo-ext"])
    );
    assert_eq!(
        root["scripts"],
        json!({"dev": "yarn next:dev", "foo:dev": "yarn workspace foo-ext dev"})
    );

    let OverlayOutcome::Applied(overlay) = report.overlay else {
        panic!("overlay should apply");
    };
    assert!(overlay.package_installed);
    assert_eq!(overlay.layout, Some("standard"));
    assert_eq!(overlay.merged_packages, vec!["nextjs".to_string()]);
    assert_eq!(overlay.copied_packages, vec!["hardhat".to_string()]);
    assert_eq!(overlay.merged_manifests, vec!["nextjs".to_string()]);
    assert!(overlay.workspace_member_added);
}

#[test]
fn overlay_installs_packages_and_removes_scratch_dir() {
    let h = Harness::new();
    let target = h.target("app");

    h.service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("foo-ext"))
        .unwrap();

    assert!(target.join("packages/foo-ext/index.ts").is_file());
    assert!(target.join("packages/hardhat/contracts/Foo.sol").is_file());
    assert!(!target.join(".temp-extension").exists());
}

#[test]
fn base_copy_applies_inclusion_rules() {
    let h = Harness::new();
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target))
        .unwrap();

    assert!(target.join("README.md").is_file());
    assert!(!target.join("CHANGELOG.md").exists());
    assert!(!target.join(".github").exists());
    assert!(!target.join("yarn.lock").exists());
    assert!(!target.join("packages/nextjs/generated").exists());
    assert!(!target.join("packages/nextjs/__tests__").exists());
    assert!(!target.join("packages/nextjs/public/.gitkeep").exists());
    assert!(target.join("packages/nextjs/public").is_dir());

    assert_eq!(read(target.join("packages/nextjs/.env")), "NEXT_PUBLIC_RPC=\n");
    assert_eq!(report.base.seeded_env.len(), 1);
    assert_eq!(report.base.merged_manifests, 2);
    assert_eq!(
        read_json(target.join("packages/nextjs/package.json"))["dependencies"]["next"],
        json!("14.0.0")
    );
}

#[test]
fn dev_mode_keeps_generated_output_and_writes_sidecars() {
    let h = Harness::new();
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_dev(true).with_extension("foo-ext"))
        .unwrap();

    assert!(target.join("yarn.lock").is_file());
    assert!(target.join("packages/nextjs/generated/deployedContracts.ts").is_file());

    let sidecar = target.join("packages/nextjs/foo.ts.dev");
    assert_eq!(report.rendered[0].sidecar.as_deref(), Some(sidecar.as_path()));
    let notes = read(sidecar);
    assert!(notes.contains("packages/nextjs/foo.template.ts"));
    assert!(notes.contains("packages/nextjs/foo.args.ts"));
    assert!(notes.contains("\"title\": \"X\""));
}

#[test]
fn unknown_extension_matches_a_plain_run() {
    let h = Harness::new();
    let plain = h.target("plain");
    let service = h.service(TemplateRegistry::new());
    service.scaffold(ScaffoldOptions::new(&plain)).unwrap();

    for (dir, flag) in [("unknown", "does-not-exist"), ("path-like", "org/unknown")] {
        let target = h.target(dir);
        let report = service
            .scaffold(ScaffoldOptions::new(&target).with_extension(flag))
            .unwrap();

        assert_eq!(
            report.overlay,
            OverlayOutcome::Skipped(SkipReason::UnknownExtension(flag.into()))
        );
        assert_eq!(snapshot(&plain), snapshot(&target));
    }
}

#[test]
fn blank_extension_is_skipped() {
    let h = Harness::new();
    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(h.target("app")).with_extension(""))
        .unwrap();

    assert_eq!(report.overlay, OverlayOutcome::Skipped(SkipReason::BlankName));
}

#[test]
fn nested_layout_is_supported() {
    let h = Harness::new();
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("nested-ext"))
        .unwrap();

    assert_eq!(report.overlay.report().unwrap().layout, Some("nested"));
    assert!(target.join("packages/nested-ext/index.ts").is_file());
    assert_eq!(
        read(target.join("packages/nextjs/foo.ts")),
        "export const title = \"Nested\";\n"
    );
    let root = read_json(target.join("package.json"));
    assert_eq!(root["scripts"]["nested"], json!("echo nested"));
    assert_eq!(
        root["workspaces"]["packages"],
        json!(["packages/nextjs", "packages/nested-ext"])
    );
}

#[test]
fn registered_render_function_is_used() {
    let h = Harness::new();
    let target = h.target("app");
    let resolver = TemplateRegistry::new().register(
        "packages/nextjs/foo.template.ts",
        |args: &RenderArgs| format!("// {}\n", args.get_str("title").unwrap_or("untitled")),
    );

    h.service(resolver)
        .scaffold(ScaffoldOptions::new(&target).with_extension("foo-ext"))
        .unwrap();

    assert_eq!(read(target.join("packages/nextjs/foo.ts")), "// X\n");
}

#[test]
fn missing_renderer_is_fatal() {
    let h = Harness::new();
    let err = h
        .service(TemplateRegistry::new().without_fallback())
        .scaffold(ScaffoldOptions::new(h.target("app")))
        .unwrap_err();

    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::TemplateMissing { .. })
    ));
    assert!(h.vcs.calls().is_empty());
}

#[test]
fn failed_fetch_aborts_before_version_control() {
    let h = Harness::new();
    let target = h.target("app");

    let err = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("gone"))
        .unwrap_err();

    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::FetchFailed { .. })
    ));
    assert!(!target.join(".temp-extension").exists());
    assert!(h.vcs.calls().is_empty());
}

#[test]
fn version_control_is_bootstrapped_on_main() {
    let h = Harness::new();
    h.service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(h.target("app")))
        .unwrap();

    assert_eq!(h.vcs.calls(), vec!["init".to_string(), "checkout -b main".to_string()]);
}

#[test]
fn existing_files_are_not_clobbered() {
    let h = Harness::new();
    let target = h.target("app");
    write(&target, "README.md", "mine\n");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target))
        .unwrap();

    assert_eq!(read(target.join("README.md")), "mine\n");
    assert_eq!(report.base.kept_existing, 1);
}

#[test]
fn extension_manifest_is_copied_into_package_without_one() {
    let h = Harness::new();
    write(&h.base, "packages/snfoundry/README.md", "# contracts\n");
    h.remote("foundry-ext", "packages/foundry-ext/index.ts", "export {};\n");
    h.remote(
        "foundry-ext",
        "packages/snfoundry/package.json",
        r#"{"name":"@app/snfoundry","scripts":{"compile":"scarb build"}}"#,
    );
    h.remote("foundry-ext", "packages/snfoundry/extra.ts", "export const extra = 1;\n");
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("foundry-ext"))
        .unwrap();

    assert!(target.join("packages/snfoundry/extra.ts").is_file());
    assert_eq!(read(target.join("packages/snfoundry/README.md")), "# contracts\n");
    assert_eq!(
        read_json(target.join("packages/snfoundry/package.json")),
        json!({"name": "@app/snfoundry", "scripts": {"compile": "scarb build"}})
    );

    let overlay = report.overlay.report().unwrap();
    assert_eq!(overlay.merged_packages, vec!["snfoundry".to_string()]);
    assert!(overlay.merged_manifests.is_empty());
}

#[test]
fn malformed_args_file_renders_with_empty_args() {
    let h = Harness::new();
    h.remote("bad-args", "packages/bad-args/index.ts", "export {};\n");
    h.remote("bad-args", "packages/nextjs/foo.args.ts", "nonsense");
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("bad-args"))
        .unwrap();

    assert_eq!(
        read(target.join("packages/nextjs/foo.ts")),
        "export const title = \"\";\n"
    );
    assert!(report.rendered[0].args_files.is_empty());
    assert!(marker_files(&target).is_empty());
    assert_eq!(h.vcs.calls().len(), 2);
}

#[test]
fn failed_install_removes_scratch_dir() {
    let h = Harness::new();
    // A file where the extension expects a directory.
    write(&h.base, "packages/hardhat/contracts", "not a directory\n");
    h.remote("broken-ext", "packages/hardhat/contracts/Foo.sol", "contract Foo {}\n");
    let target = h.target("app");

    let err = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_extension("broken-ext"))
        .unwrap_err();

    assert!(matches!(
        err,
        StrataError::Application(ApplicationError::ExtensionInstall { ref extension, .. })
            if extension == "broken-ext"
    ));
    assert!(!target.join(".temp-extension").exists());
    assert!(h.vcs.calls().is_empty());
}

#[cfg(unix)]
#[test]
fn dev_mode_links_base_files_back_to_the_template() {
    let h = Harness::new();
    write(&h.base, "packages/nextjs/app/page.tsx", "base page\n");
    h.remote("foo-ext", "packages/nextjs/app/page.tsx", "extension page\n");
    let target = h.target("app");

    let report = h
        .service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target).with_dev(true).with_extension("foo-ext"))
        .unwrap();

    let readme = target.join("README.md");
    assert!(is_symlink(&readme));
    assert_eq!(
        std::fs::canonicalize(&readme).unwrap(),
        std::fs::canonicalize(h.base.join("README.md")).unwrap()
    );
    assert!(report.base.linked_files > 0);

    // Generated output is copied, not linked.
    assert!(target.join("yarn.lock").is_file());
    assert!(!is_symlink(&target.join("yarn.lock")));
    assert!(!is_symlink(&target.join("packages/nextjs/generated/deployedContracts.ts")));

    // Overlay writes replace the link and leave the template alone.
    let page = target.join("packages/nextjs/app/page.tsx");
    assert!(!is_symlink(&page));
    assert_eq!(read(&page), "extension page\n");
    assert_eq!(read(h.base.join("packages/nextjs/app/page.tsx")), "base page\n");

    // Marker cleanup removes the link only.
    assert!(std::fs::symlink_metadata(target.join("packages/nextjs/foo.template.ts")).is_err());
    assert!(h.base.join("packages/nextjs/foo.template.ts").is_file());
}

#[test]
fn nested_lockfiles_are_left_out_of_plain_runs() {
    let h = Harness::new();
    write(&h.base, "packages/nextjs/yarn.lock", "# nested lockfile\n");
    let target = h.target("app");

    h.service(TemplateRegistry::new())
        .scaffold(ScaffoldOptions::new(&target))
        .unwrap();

    assert!(!target.join("packages/nextjs/yarn.lock").exists());
}
