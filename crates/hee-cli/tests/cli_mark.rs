use std::path::Path;
use std::process::{Command, Output};

fn hee(state: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hee"))
        .arg("--state-dir")
        .arg(state)
        .args(args)
        .output()
        .expect("spawn hee")
}

fn log_path(state: &Path) -> std::path::PathBuf {
    state.join("evidence").join("marks.log")
}

fn assert_mark_line(line: &str, message: &str) {
    let (ts, rest) = line.split_once(' ').expect("timestamp separator");
    assert_eq!(rest, message);
    chrono::DateTime::parse_from_rfc3339(ts).expect("RFC 3339 timestamp");
}

#[test]
fn mark_appends_one_line_and_echoes_it() {
    let tmp = tempfile::tempdir().unwrap();

    let out = hee(tmp.path(), &["mark", "deployed v2"]);
    assert_eq!(out.status.code(), Some(0), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));

    let log = std::fs::read_to_string(log_path(tmp.path())).unwrap();
    assert!(log.ends_with('\n'));
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_mark_line(lines[0], "deployed v2");
    assert_eq!(String::from_utf8_lossy(&out.stdout), log);
}

#[test]
fn mark_joins_multiple_tokens() {
    let tmp = tempfile::tempdir().unwrap();
    let out = hee(tmp.path(), &["mark", "deployed", "v2", "--force"]);
    assert!(out.status.success());

    let log = std::fs::read_to_string(log_path(tmp.path())).unwrap();
    assert_mark_line(log.trim_end(), "deployed v2 --force");
}

#[test]
fn repeated_marks_only_append() {
    let tmp = tempfile::tempdir().unwrap();
    let mut previous = String::new();

    for i in 0..4 {
        let msg = format!("step {i}");
        assert!(hee(tmp.path(), &["mark", &msg]).status.success());

        let log = std::fs::read_to_string(log_path(tmp.path())).unwrap();
        assert!(log.starts_with(&previous), "history rewritten at step {i}");
        assert_eq!(log.lines().count(), i + 1);
        assert_mark_line(log.lines().last().unwrap(), &msg);
        previous = log;
    }
}

#[test]
fn missing_message_exits_2_and_leaves_log_alone() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(hee(tmp.path(), &["mark", "first"]).status.success());
    let before = std::fs::metadata(log_path(tmp.path())).unwrap().len();

    for args in [&["mark"][..], &["mark", ""][..], &["mark", "a\nb"][..]] {
        let out = hee(tmp.path(), args);
        assert_eq!(out.status.code(), Some(2), "args {args:?}");
        assert!(String::from_utf8_lossy(&out.stderr).contains("usage: hee mark <msg>"));
        assert!(out.stdout.is_empty());
    }

    let after = std::fs::metadata(log_path(tmp.path())).unwrap().len();
    assert_eq!(before, after);
}

#[cfg(unix)]
#[test]
fn non_utf8_message_is_usage_error() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = tempfile::tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_hee"))
        .arg("--state-dir")
        .arg(tmp.path())
        .arg("mark")
        .arg(OsStr::from_bytes(b"bad\xff"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("valid UTF-8"), "stderr:\n{stderr}");
    assert!(stderr.contains("usage: hee mark <msg>"), "stderr:\n{stderr}");
    assert!(!log_path(tmp.path()).exists());
}

#[test]
fn whitespace_only_message_is_recorded_verbatim() {
    let tmp = tempfile::tempdir().unwrap();
    let out = hee(tmp.path(), &["mark", "   "]);
    assert_eq!(out.status.code(), Some(0));

    let log = std::fs::read_to_string(log_path(tmp.path())).unwrap();
    let (ts, rest) = log.split_once(' ').unwrap();
    chrono::DateTime::parse_from_rfc3339(ts).unwrap();
    assert_eq!(rest, "   \n");
}

#[test]
fn missing_message_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = hee(tmp.path(), &["mark"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!log_path(tmp.path()).exists());
}

#[test]
fn unwritable_log_exits_1_with_cause() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let log = blocker.join("marks.log");

    let out = Command::new(env!("CARGO_BIN_EXE_hee"))
        .arg("--state-dir")
        .arg(tmp.path())
        .arg("--log")
        .arg(&log)
        .args(["mark", "will not land"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to write evidence mark"), "stderr:\n{stderr}");
    assert!(stderr.contains("blocker"), "stderr:\n{stderr}");
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "x");
}

#[test]
fn log_flag_and_config_file_redirect_the_log() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "log_path = \"audit.log\"\n").unwrap();

    assert!(hee(tmp.path(), &["mark", "via config"]).status.success());
    let from_config = std::fs::read_to_string(tmp.path().join("audit.log")).unwrap();
    assert_mark_line(from_config.trim_end(), "via config");

    let flag_log = tmp.path().join("flag.log");
    let out = Command::new(env!("CARGO_BIN_EXE_hee"))
        .arg("--state-dir")
        .arg(tmp.path())
        .arg("--log")
        .arg(&flag_log)
        .args(["mark", "via flag"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_mark_line(std::fs::read_to_string(&flag_log).unwrap().trim_end(), "via flag");
}

#[test]
fn concurrent_marks_both_land_whole() {
    let tmp = tempfile::tempdir().unwrap();
    let spawn = |msg: &str| {
        Command::new(env!("CARGO_BIN_EXE_hee"))
            .arg("--state-dir")
            .arg(tmp.path())
            .args(["mark", msg])
            .spawn()
            .expect("spawn hee")
    };

    let mut a = spawn("alpha did the thing");
    let mut b = spawn("bravo did the other thing");
    assert!(a.wait().unwrap().success());
    assert!(b.wait().unwrap().success());

    let log = std::fs::read_to_string(log_path(tmp.path())).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    let mut messages: Vec<&str> = lines
        .iter()
        .map(|l| l.split_once(' ').expect("separator").1)
        .collect();
    messages.sort();
    assert_eq!(messages, vec!["alpha did the thing", "bravo did the other thing"]);
    for line in lines {
        chrono::DateTime::parse_from_rfc3339(line.split_once(' ').unwrap().0).unwrap();
    }
}
