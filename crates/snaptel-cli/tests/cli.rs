use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[cfg(windows)]
const DELIM: &str = ";";
#[cfg(not(windows))]
const DELIM: &str = ":";

fn snaptel(base_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("snaptel").unwrap();
    cmd.arg("--base-dir")
        .arg(base_dir)
        .env_remove("RUST_LOG")
        .env_remove("SNAPTEL_URL");
    cmd
}

fn write_config(base_dir: &Path, content: &str) {
    fs::write(base_dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_unload_prints_result() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("DELETE", "/v1/plugins/storage/mock-collector/2")
        .with_status(200)
        .with_body(
            r#"{"meta":{"code":200,"message":"Plugin successfully unloaded (mock-collectorv2)","type":"plugin_unloaded"},
                "body":{"name":"mock-collector","version":2,"type":"storage"}}"#,
        )
        .create();

    let temp = TempDir::new().unwrap();
    snaptel(temp.path())
        .args(["--url", &server.url(), "unload", "storage", "mock-collector", "2"])
        .assert()
        .success()
        .stdout("Plugin unloaded\nName: mock-collector\nVersion: 2\nType: storage\n");
}

#[test]
fn test_unload_invalid_version_is_usage_error() {
    let temp = TempDir::new().unwrap();
    snaptel(temp.path())
        .args(["--url", "http://127.0.0.1:1", "unload", "storage", "mock-collector", "0"])
        .assert()
        .code(64)
        .stdout("")
        .stderr(predicate::str::contains("Must provide plugin version"))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_swap_renders_both_blocks() {
    let mut server = mockito::Server::new();
    let _load = server
        .mock("POST", "/v1/plugins")
        .with_status(201)
        .with_body(
            r#"{"meta":{"code":201},"body":{"loaded_plugins":[{
                "name":"new-plugin","version":1,"type":"storage","signed":false,
                "status":"loaded","loaded_timestamp":1448037600}]}}"#,
        )
        .create();
    let _unload = server
        .mock("DELETE", "/v1/plugins/storage/old-plugin/1")
        .with_status(200)
        .with_body(r#"{"body":{"name":"old-plugin","version":1,"type":"storage"}}"#)
        .create();

    let temp = TempDir::new().unwrap();
    let plugin = temp.path().join("new.plugin");
    fs::write(&plugin, b"plugin").unwrap();
    let target = ["storage", "old-plugin", "1"].join(DELIM);

    snaptel(temp.path())
        .args(["--url", &server.url(), "swap"])
        .arg(&plugin)
        .arg(&target)
        .assert()
        .success()
        .stdout(
            "Plugin loaded\n\
             Name: new-plugin\n\
             Version: 1\n\
             Type: storage\n\
             Signed: false\n\
             Loaded Time: Fri, 20 Nov 2015 16:40:00 UTC\n\
             \n\
             Plugin unloaded\n\
             Name: old-plugin\n\
             Version: 1\n\
             Type: storage\n",
        );
}

#[test]
fn test_swap_remote_failure() {
    let mut server = mockito::Server::new();
    let _load = server
        .mock("POST", "/v1/plugins")
        .with_status(400)
        .with_body(r#"{"body":{"message":"plugin signature invalid","fields":{"error":"bad sig"}}}"#)
        .create();

    let temp = TempDir::new().unwrap();
    let plugin = temp.path().join("new.plugin");
    fs::write(&plugin, b"plugin").unwrap();

    snaptel(temp.path())
        .args(["--url", &server.url(), "swap"])
        .arg(&plugin)
        .args([
            "--plugin-type",
            "storage",
            "--plugin-name",
            "old-plugin",
            "--plugin-version",
            "1",
        ])
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("remote state unknown"))
        .stderr(predicate::str::contains("plugin signature invalid"))
        .stderr(predicate::str::contains("bad sig"));
}

#[test]
fn test_swap_without_unload_target() {
    let temp = TempDir::new().unwrap();
    snaptel(temp.path())
        .args(["--url", "http://127.0.0.1:1", "swap", "./new.plugin"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("Must provide plugin type"));
}

#[test]
fn test_list_plugins_table() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/v1/plugins")
        .with_status(200)
        .with_body(
            r#"{"body":{"loaded_plugins":[{"name":"cpu","version":6,"type":"collector",
                "signed":true,"status":"loaded","loaded_timestamp":1448037600}]}}"#,
        )
        .create();

    let temp = TempDir::new().unwrap();
    snaptel(temp.path())
        .args(["--url", &server.url(), "list-plugins"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("NAME VERSION TYPE"))
        .stdout(predicate::str::contains("cpu  6       collector"));
}

#[test]
fn test_list_catalog_filters() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/plugin")
        .with_status(200)
        .with_body(
            r#"[
                {"name":"cpu","full_name":"intelsdi-x/snap-plugin-collector-cpu","type":"collector"},
                {"name":"file","full_name":"intelsdi-x/snap-plugin-publisher-file","type":"publisher"}
            ]"#,
        )
        .create();

    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        &format!("[catalog]\nurl = \"{}/plugin\"\n", server.url()),
    );

    snaptel(temp.path())
        .args(["list-catalog", "--plugin-type", "publisher"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[\n    {\n        \"name\": \"file\""))
        .stdout(predicate::str::contains("cpu").not());
}

#[test]
fn test_release_links() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/repos/intelsdi-x/snap-plugin-collector-cpu/releases/latest")
        .with_status(200)
        .with_body(
            r#"{"tag_name":"6.0.0","assets":[
                {"browser_download_url":"https://github.com/a/linux"},
                {"browser_download_url":"https://github.com/a/darwin"}]}"#,
        )
        .create();

    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        &format!("[release]\napi_url = \"{}\"\n", server.url()),
    );

    snaptel(temp.path())
        .args(["release-links", "snap-plugin-collector-cpu"])
        .assert()
        .success()
        .stdout("https://github.com/a/linux\nhttps://github.com/a/darwin\n");
}

#[test]
fn test_release_links_malformed() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/repos/intelsdi-x/broken/releases/latest")
        .with_status(200)
        .with_body(r#"{"tag_name":"1.0.0","assets":{"browser_download_url":"x"}}"#)
        .create();

    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        &format!("[release]\napi_url = \"{}\"\n", server.url()),
    );

    snaptel(temp.path())
        .args(["release-links", "broken"])
        .assert()
        .code(4)
        .stdout("")
        .stderr(predicate::str::contains("Malformed release document"));
}

#[test]
fn test_download_to_url_file_name() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/files/snap-plugin-collector-cpu")
        .with_status(200)
        .with_body("0123456789")
        .create();

    let temp = TempDir::new().unwrap();
    let url = format!("{}/files/snap-plugin-collector-cpu", server.url());

    snaptel(temp.path())
        .current_dir(temp.path())
        .args(["download", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloading"))
        .stdout(predicate::str::contains("10 bytes downloaded."));

    assert_eq!(
        fs::read_to_string(temp.path().join("snap-plugin-collector-cpu")).unwrap(),
        "0123456789"
    );
}

#[test]
fn test_download_does_not_read_config() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/files/plugin")
        .with_status(200)
        .with_body("abc")
        .create();

    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "this is [not toml");
    let url = format!("{}/files/plugin", server.url());

    snaptel(temp.path())
        .current_dir(temp.path())
        .args(["download", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 bytes downloaded."));

    // A command that reads the config still reports the parse failure
    snaptel(temp.path())
        .args(["release-links", "snap-plugin-collector-cpu"])
        .assert()
        .failure()
        .stdout("");
}

#[test]
fn test_config_path() {
    let temp = TempDir::new().unwrap();
    snaptel(temp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
