//! Remote provisioner error mapping, standalone add-on installs, run plans.

mod support;

use launchpad_core::{AddonId, AppName, InstallError, InstallationConfig, Step};
use launchpad_install::{plan, prepare_storage, Installer, RemoteProvisioner};
use launchpad_platform::PlatformError;
use rstest::rstest;
use tempfile::TempDir;

use support::{FakePlatform, FakeRunner, FakeStore};

fn name() -> AppName {
    AppName::parse("demo").unwrap()
}

// ---------------------------------------------------------------------------
// 1. Provisioner
// ---------------------------------------------------------------------------

#[rstest]
#[case::conflict(|| PlatformError::Conflict { message: "taken".into() })]
#[case::unauthorized(|| PlatformError::Unauthorized { message: "bad key".into() })]
#[case::server(|| PlatformError::Status { code: 500, message: "boom".into() })]
fn create_app_errors_are_mapped(#[case] make: fn() -> PlatformError) {
    let fake = FakePlatform {
        create_error: Some(make),
        ..FakePlatform::default()
    };
    let err = RemoteProvisioner::new(&fake).create_app(&name()).unwrap_err();
    match make() {
        PlatformError::Conflict { .. } => {
            assert!(matches!(err, InstallError::RemoteConflict { ref name } if name == "demo"))
        }
        PlatformError::Unauthorized { .. } => assert!(matches!(err, InstallError::RemoteAuth(_))),
        _ => assert!(matches!(
            err,
            InstallError::Remote {
                operation: "create-app",
                ..
            }
        )),
    }
}

#[test]
fn addon_failure_names_addon_and_stops() {
    let fake = FakePlatform {
        fail_addon_at: Some(1),
        ..FakePlatform::default()
    };
    let provisioner = RemoteProvisioner::new(&fake);
    let app = provisioner.create_app(&name()).unwrap();
    let addons: Vec<AddonId> = ["a", "b", "c"].into_iter().map(AddonId::from).collect();

    let err = provisioner.install_addons(&app, &addons).unwrap_err();
    assert!(matches!(err, InstallError::AddonInstall { ref addon, .. } if addon == "b"));
    assert_eq!(fake.calls().addon_attempts, 2);
    assert_eq!(fake.calls().addons, ["a"]);
}

#[test]
fn existing_app_resolves_platform_id() {
    let fake = FakePlatform::default();
    let handle = RemoteProvisioner::new(&fake).existing_app(&name()).unwrap();
    assert_eq!(handle.id, "id-demo");
    assert_eq!(fake.calls().creates, 0);
}

// ---------------------------------------------------------------------------
// 2. Storage
// ---------------------------------------------------------------------------

#[test]
fn storage_is_noop_without_credentials() {
    let store = FakeStore::default();
    let config = InstallationConfig::builder("demo").api_key("k").build().unwrap();
    assert_eq!(prepare_storage(&config, &&store).unwrap(), None);
    assert_eq!(*store.connects.borrow(), 0);
}

#[test]
fn second_bucket_creation_fails() {
    let store = FakeStore::default();
    let config = InstallationConfig::builder("demo")
        .api_key("k")
        .storage(Some("id".into()), Some("secret".into()))
        .build()
        .unwrap();

    assert_eq!(
        prepare_storage(&config, &&store).unwrap().as_deref(),
        Some("demo-assets")
    );
    let err = prepare_storage(&config, &&store).unwrap_err();
    assert!(matches!(err, InstallError::StorageProvision { .. }));
}

// ---------------------------------------------------------------------------
// 3. Standalone operations
// ---------------------------------------------------------------------------

#[rstest]
#[case::fallback(vec![], vec!["openredis", "exceptional"])]
#[case::explicit(vec!["exceptional"], vec!["exceptional"])]
fn optional_addons_install_on_existing_app(
    #[case] explicit: Vec<&str>,
    #[case] expected: Vec<&str>,
) {
    let workdir = TempDir::new().unwrap();
    let platform = FakePlatform::default();
    let store = FakeStore::default();
    let runner = FakeRunner::default();
    let config = InstallationConfig::builder("demo")
        .api_key("k")
        .addons(explicit)
        .build()
        .unwrap();

    let installed = Installer::new(&platform, &store, &runner, workdir.path())
        .install_optional_addons(&config)
        .unwrap();

    let installed: Vec<&str> = installed.iter().map(AddonId::as_str).collect();
    assert_eq!(installed, expected);
    assert_eq!(platform.calls().addons, expected);
    assert_eq!(platform.calls().creates, 0);
}

#[test]
fn render_env_reads_vars_without_side_effects() {
    let workdir = TempDir::new().unwrap();
    let platform = FakePlatform::with_vars(&[("FOO", "bar")]);
    let store = FakeStore::default();
    let runner = FakeRunner::default();
    let config = InstallationConfig::builder("demo").api_key("k").build().unwrap();

    let env = Installer::new(&platform, &store, &runner, workdir.path())
        .render_env(&config)
        .unwrap();
    assert_eq!(env.get("FOO"), Some("bar"));
    assert!(runner.lines().is_empty());
    assert_eq!(platform.calls().creates, 0);
    assert_eq!(platform.calls().addon_attempts, 0);
}

// ---------------------------------------------------------------------------
// 4. Plan
// ---------------------------------------------------------------------------

#[test]
fn plan_skips_disabled_steps() {
    let config = InstallationConfig::builder("demo").api_key("k").build().unwrap();
    let steps = plan(&config);
    assert_eq!(steps.len(), Step::ALL.len());

    let skipped: Vec<Step> = steps
        .iter()
        .filter(|p| p.action.is_none())
        .map(|p| p.step)
        .collect();
    assert_eq!(
        skipped,
        [
            Step::PrepareStorage,
            Step::WriteProcfile,
            Step::SetAccount,
            Step::ProvisionWorkers
        ]
    );
}

#[test]
fn plan_with_workers_includes_scaling() {
    let config = InstallationConfig::builder("demo")
        .api_key("k")
        .workers(Some(2))
        .build()
        .unwrap();
    let scaling = plan(&config)
        .into_iter()
        .find(|p| p.step == Step::ProvisionWorkers)
        .unwrap();
    assert_eq!(scaling.action.as_deref(), Some("scale worker to 2"));
}
