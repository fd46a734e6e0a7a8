//! Tests for the repository mirror builder
//!
//! Online and offline runs use temporary directories for every path the
//! builder touches; host commands are recorded instead of run.

use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use foreman_setup::command_runner::RecordingExecutor;
use foreman_setup::error::SetupError;
use foreman_setup::hardware::HostProfile;
use foreman_setup::mirror::{archive, run_mirror, MirrorOptions, MirrorRequest};
use foreman_setup::prompt::ScriptedPrompter;
use tempfile::TempDir;

fn host() -> HostProfile {
    HostProfile {
        release: "4.18.0-513.el8.x86_64".to_string(),
        cpu_cores: 4,
        memory_gb: 20,
        hostname: "mirror.example.com".to_string(),
        ip_address: IpAddr::V4(Ipv4Addr::new(192, 0, 2, 20)),
        multiplexed: true,
    }
}

fn options(root: &Path) -> MirrorOptions {
    MirrorOptions {
        workdir: root.join("foreman-repos"),
        archive: root.join("foreman-repos.tar"),
        destination: root.join("var-lib"),
        repos_dir: root.join("yum.repos.d"),
        gpg_dir: root.join("rpm-gpg"),
        staging_dir: root.join("staging"),
    }
}

fn request(online: bool, offline: bool, options: MirrorOptions) -> MirrorRequest {
    MirrorRequest {
        online,
        offline,
        foreman_version: Some("3.5".to_string()),
        katello_version: Some("4.7".to_string()),
        noprompt: true,
        options,
    }
}

// =============================================================================
// Mode selection
// =============================================================================

#[test]
fn test_both_modes_rejected_before_any_command() {
    let temp = TempDir::new().unwrap();
    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::new(false);

    let err = run_mirror(
        &host(),
        &mut prompter,
        &mut executor,
        &request(true, true, options(temp.path())),
    )
    .unwrap_err();

    assert!(matches!(err, SetupError::AmbiguousMode));
    assert!(executor.commands().is_empty());
    assert!(!temp.path().join("foreman-repos").exists());
}

#[test]
fn test_no_mode_rejected() {
    let temp = TempDir::new().unwrap();
    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::new(false);

    let err = run_mirror(
        &host(),
        &mut prompter,
        &mut executor,
        &request(false, false, options(temp.path())),
    )
    .unwrap_err();

    assert!(matches!(err, SetupError::ModeNotSelected));
}

#[test]
fn test_missing_version_with_noprompt_fails() {
    let temp = TempDir::new().unwrap();
    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::new(false);
    let req = MirrorRequest {
        katello_version: None,
        ..request(true, false, options(temp.path()))
    };

    let err = run_mirror(&host(), &mut prompter, &mut executor, &req).unwrap_err();

    assert!(matches!(
        err,
        SetupError::MissingParameter {
            field: "Katello version"
        }
    ));
    assert!(executor.commands().is_empty());
}

// =============================================================================
// Online side
// =============================================================================

#[test]
fn test_online_packs_workdir_with_keys() {
    let temp = TempDir::new().unwrap();
    let opts = options(temp.path());

    fs::create_dir_all(&opts.repos_dir).unwrap();
    fs::write(
        opts.repos_dir.join("katello.repo"),
        "[pulpcore]\nname=pulpcore\n\
         gpgkey=https://yum.theforeman.org/pulpcore/3.22/GPG-RPM-KEY-pulpcore\n",
    )
    .unwrap();
    fs::create_dir_all(&opts.gpg_dir).unwrap();
    fs::write(opts.gpg_dir.join("RPM-GPG-KEY-AlmaLinux"), "alma").unwrap();
    fs::write(opts.gpg_dir.join("RPM-GPG-KEY-foreman"), "foreman").unwrap();

    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::new(false);
    let report = run_mirror(
        &host(),
        &mut prompter,
        &mut executor,
        &request(true, false, opts.clone()),
    )
    .unwrap();

    assert_eq!(
        report.keys_collected,
        vec![
            "GPG-RPM-KEY-pulpcore",
            "RPM-GPG-KEY-AlmaLinux",
            "RPM-GPG-KEY-foreman"
        ]
    );

    let rendered = executor.rendered();
    assert!(rendered[0].contains("/releases/3.5/"));
    assert!(rendered.iter().any(|l| l
        == &format!(
            "reposync --delete --download-metadata -p {} -n --repo pulpcore",
            opts.workdir.display()
        )));
    assert!(rendered
        .iter()
        .any(|l| l.starts_with("wget -P") && l.ends_with("GPG-RPM-KEY-pulpcore")));

    let paths = archive::entries(&report.archive).unwrap();
    assert!(archive::is_rooted_at(&paths, "foreman-repos"));
    assert!(paths
        .iter()
        .any(|p| p == Path::new("foreman-repos/RPM-GPG-KEY-AlmaLinux")));
}

#[test]
fn test_online_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let opts = options(temp.path());
    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::dry_run(false);

    run_mirror(
        &host(),
        &mut prompter,
        &mut executor,
        &request(true, false, opts.clone()),
    )
    .unwrap();

    assert!(!opts.workdir.exists());
    assert!(!opts.archive.exists());
    assert!(!executor.commands().is_empty());
}

// =============================================================================
// Offline side
// =============================================================================

#[test]
fn test_offline_stages_repo_files_for_mirror_root() {
    let temp = TempDir::new().unwrap();
    let opts = options(temp.path());

    let scratch = temp.path().join("scratch");
    fs::create_dir_all(scratch.join("baseos")).unwrap();
    fs::write(scratch.join("RPM-GPG-KEY-foreman"), "key").unwrap();
    archive::pack(&scratch, "foreman-repos", &opts.archive).unwrap();

    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::new(true);
    let report = run_mirror(
        &host(),
        &mut prompter,
        &mut executor,
        &request(false, true, opts.clone()),
    )
    .unwrap();

    assert_eq!(report.repo_files.len(), 5);
    assert!(report.repo_files.contains(&opts.repos_dir.join("katello.repo")));

    let alma = fs::read_to_string(opts.staging_dir.join("alma.repo")).unwrap();
    let mirror_root = opts.destination.join("foreman-repos");
    assert!(alma.contains(&format!("baseurl=file://{}/baseos", mirror_root.display())));

    let rendered = executor.rendered();
    assert!(rendered[0].starts_with("sudo tar --skip-old-files -xf"));
    assert!(rendered[1].starts_with("sudo find"));
    assert!(rendered[2].starts_with("sudo mv -f"));
    assert!(rendered[3].starts_with("sudo restorecon"));
    assert!(rendered[4].starts_with("sudo chown root:"));
    assert_eq!(rendered[5], "dnf repolist");
}

#[test]
fn test_offline_rejects_archive_with_foreign_root() {
    let temp = TempDir::new().unwrap();
    let opts = options(temp.path());

    let scratch = temp.path().join("scratch");
    fs::create_dir_all(&scratch).unwrap();
    fs::write(scratch.join("passwd"), "root:x:0:0").unwrap();
    archive::pack(&scratch, "etc", &opts.archive).unwrap();

    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::new(true);
    let err = run_mirror(
        &host(),
        &mut prompter,
        &mut executor,
        &request(false, true, opts),
    )
    .unwrap_err();

    assert!(matches!(err, SetupError::General(_)));
    assert!(executor.commands().is_empty());
}

#[test]
fn test_mirror_refuses_non_el8_host() {
    let temp = TempDir::new().unwrap();
    let mut h = host();
    h.release = "6.1.0-18-amd64".to_string();
    let mut prompter = ScriptedPrompter::silent();
    let mut executor = RecordingExecutor::new(false);

    let err = run_mirror(
        &h,
        &mut prompter,
        &mut executor,
        &request(true, false, options(temp.path())),
    )
    .unwrap_err();

    assert!(matches!(err, SetupError::UnsupportedPlatform { .. }));
}
