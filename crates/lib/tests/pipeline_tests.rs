//! End-to-end pipeline scenarios against a project on disk.
//!
//! External commands go through a stub runner that logs every invocation, so
//! the tests observe exactly which stages spawned processes and in what order.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use shipwright_lib::build::{BridgeVariant, BuildError, BuildState, Orchestrator};
use shipwright_lib::config::{BuildMode, BuildOptions, ProjectOptions};
use shipwright_lib::execute::{CommandRunner, CommandSpec, RunError};
use shipwright_lib::fingerprint::{FingerprintStore, ManifestFingerprint};
use shipwright_lib::stage::{LogReporter, StageKind};
use tempfile::TempDir;

const PROJECT_JSON: &str = r#"{
  "name": "demo",
  "binaryname": "demo",
  "frontend": {
    "dir": "frontend",
    "install": "npm install",
    "build": "npm run build",
    "serve": "npm run serve",
    "bridge": "src"
  },
  "package": "./scripts/package.sh"
}"#;

/// Logs invocations and fails the command whose text contains `fail_on`.
#[derive(Default)]
struct StubRunner {
  log: RefCell<Vec<String>>,
  fail_on: Option<&'static str>,
}

impl StubRunner {
  fn failing_on(needle: &'static str) -> Self {
    Self {
      fail_on: Some(needle),
      ..Default::default()
    }
  }

  fn invoked(&self, needle: &str) -> usize {
    self.log.borrow().iter().filter(|c| c.contains(needle)).count()
  }
}

impl CommandRunner for StubRunner {
  async fn run(&self, spec: &CommandSpec) -> Result<(), RunError> {
    let text = spec.to_string();
    self.log.borrow_mut().push(text.clone());

    if self.fail_on.is_some_and(|needle| text.contains(needle)) {
      return Err(RunError::Exit {
        program: spec.program.clone(),
        code: Some(1),
      });
    }

    // Mimic the compiler producing the binary so packaging has its input.
    if spec.args.first().is_some_and(|a| a == "build") {
      if let Some(pos) = spec.args.iter().position(|a| a == "-o") {
        fs::write(spec.cwd.join(&spec.args[pos + 1]), "").unwrap();
      }
    }

    Ok(())
  }
}

struct Project {
  _temp: TempDir,
  options: ProjectOptions,
}

impl Project {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("project.json"), PROJECT_JSON).unwrap();
    fs::create_dir_all(temp.path().join("frontend")).unwrap();
    fs::write(
      temp.path().join("frontend/package.json"),
      r#"{"dependencies":{"vue":"^3.4.0"}}"#,
    )
    .unwrap();

    let options = ProjectOptions::load(temp.path()).unwrap();
    Self { _temp: temp, options }
  }

  fn manifest(&self) -> PathBuf {
    self.options.manifest_path()
  }

  fn record(&self) -> Option<String> {
    fs::read_to_string(FingerprintStore::new().record_path(&self.manifest())).ok()
  }

  fn bridge(&self) -> PathBuf {
    self.options.bridge_dir().join("runtimebridge.js")
  }
}

fn fingerprint(manifest: &Path) -> String {
  ManifestFingerprint::of_file(manifest).unwrap().as_str().to_string()
}

async fn build(project: &Project, runner: &StubRunner, options: BuildOptions) -> Result<BuildState, BuildError> {
  let mut orch = Orchestrator::new(&project.options, options, runner, &LogReporter);
  let result = orch.run().await;
  result.map(|_| orch.state())
}

#[tokio::test]
async fn first_build_installs_and_records_fingerprint() {
  let project = Project::new();
  let runner = StubRunner::default();

  let state = build(&project, &runner, BuildOptions::default()).await.unwrap();

  assert_eq!(state, BuildState::Done);
  assert_eq!(runner.invoked("npm install"), 1);
  assert_eq!(project.record(), Some(fingerprint(&project.manifest())));
  assert_eq!(
    fs::read_to_string(project.bridge()).unwrap(),
    BridgeVariant::Production.contents()
  );
}

#[tokio::test]
async fn scenario_a_unchanged_manifest_skips_install() {
  let project = Project::new();
  build(&project, &StubRunner::default(), BuildOptions::default())
    .await
    .unwrap();

  let runner = StubRunner::default();
  build(&project, &runner, BuildOptions::default()).await.unwrap();

  assert_eq!(runner.invoked("npm install"), 0);
  assert_eq!(runner.invoked("npm run build"), 1);
  assert_eq!(runner.invoked("go build"), 1);
}

#[tokio::test]
async fn scenario_b_changed_manifest_reinstalls() {
  let project = Project::new();
  build(&project, &StubRunner::default(), BuildOptions::default())
    .await
    .unwrap();
  let before = project.record().unwrap();

  fs::write(project.manifest(), r#"{"dependencies":{"vue":"^3.5.0"}}"#).unwrap();
  let runner = StubRunner::default();
  build(&project, &runner, BuildOptions::default()).await.unwrap();

  assert_eq!(runner.invoked("npm install"), 1);
  let after = project.record().unwrap();
  assert_ne!(before, after);
  assert_eq!(after, fingerprint(&project.manifest()));
}

#[tokio::test]
async fn scenario_c_failed_install_halts_without_record() {
  let project = Project::new();
  let runner = StubRunner::failing_on("npm install");

  let err = build(&project, &runner, BuildOptions::default()).await.unwrap_err();

  assert!(matches!(
    err,
    BuildError::CommandFailed {
      stage: StageKind::Install,
      ..
    }
  ));
  let install = CommandSpec::shell("npm install", project.options.frontend_dir());
  assert_eq!(*runner.log.borrow(), vec![install.to_string()]);
  assert_eq!(project.record(), None);
  assert!(!project.bridge().exists());
}

#[tokio::test]
async fn scenario_d_debug_compile_flags() {
  let project = Project::new();
  let runner = StubRunner::default();
  let options = BuildOptions {
    mode: BuildMode::Debug,
    ..Default::default()
  };

  build(&project, &runner, options).await.unwrap();

  let log = runner.log.borrow();
  let compile = log.iter().find(|c| c.starts_with("go build")).unwrap();
  assert_eq!(compile, r#"go build -o demo -ldflags "-X main.BuildMode=debug""#);
}

#[tokio::test]
async fn scenario_d_release_compile_flags() {
  let project = Project::new();
  let runner = StubRunner::default();

  build(&project, &runner, BuildOptions::default()).await.unwrap();

  let log = runner.log.borrow();
  let compile = log.iter().find(|c| c.starts_with("go build")).unwrap();
  assert_eq!(
    compile,
    r#"go build -o demo -ldflags "-w -s -X main.BuildMode=release""#
  );
}

#[tokio::test]
async fn force_rebuild_always_installs() {
  let project = Project::new();
  build(&project, &StubRunner::default(), BuildOptions::default())
    .await
    .unwrap();

  let runner = StubRunner::default();
  let options = BuildOptions {
    force_rebuild: true,
    mode: BuildMode::Debug,
    ..Default::default()
  };
  build(&project, &runner, options).await.unwrap();

  assert_eq!(runner.invoked("npm install"), 1);
  assert_eq!(runner.invoked("go build -o demo -a "), 1);
}

#[tokio::test]
async fn stages_run_in_pipeline_order() {
  let project = Project::new();
  let runner = StubRunner::default();
  let options = BuildOptions {
    package: true,
    ..Default::default()
  };

  build(&project, &runner, options).await.unwrap();

  let log = runner.log.borrow();
  assert_eq!(log.len(), 4);
  assert!(log[0].contains("npm install"));
  assert!(log[1].contains("npm run build"));
  assert!(log[2].starts_with("go build"));
  assert!(log[3].contains("package.sh"));
}

#[tokio::test]
async fn failed_frontend_build_stops_compile_and_package() {
  let project = Project::new();
  let runner = StubRunner::failing_on("npm run build");
  let options = BuildOptions {
    package: true,
    ..Default::default()
  };

  let err = build(&project, &runner, options).await.unwrap_err();

  assert_eq!(err.stage(), Some(StageKind::Frontend));
  assert_eq!(runner.invoked("go build"), 0);
  assert_eq!(runner.invoked("package.sh"), 0);
  // Earlier side effects are not rolled back.
  assert!(project.record().is_some());
  assert!(project.bridge().exists());
}

#[tokio::test]
async fn serve_variant_writes_serve_bridge() {
  let project = Project::new();
  let options = BuildOptions {
    bridge: BridgeVariant::Serve,
    ..Default::default()
  };

  build(&project, &StubRunner::default(), options).await.unwrap();

  assert_eq!(
    fs::read_to_string(project.bridge()).unwrap(),
    BridgeVariant::Serve.contents()
  );
}
