mod common;

use assert_cmd::Command;
use predicates::str::contains;

fn shell(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ballet_core_cli").unwrap();
    cmd.env("BALLET_CORE_CLI_SCRIPT", "1")
        .env("BALLET_CORE_HOME", data_dir)
        .env("BALLET_CORE_TODAY", "2024-05-20")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn school_commands_need_a_session() {
    let dir = common::data_dir();
    shell(&dir)
        .write_stdin("students\nexit\n")
        .assert()
        .success()
        .stdout(contains("You need to sign in first."));
}

#[test]
fn script_mode_runs_an_enrollment_flow() {
    let dir = common::data_dir();
    let script = [
        "login admin@balletmanager.com segredo",
        "guardian-add name=\"Carla Dias\" phone=11912345678 email=carla@email.com cpf=12345678900 relationship=Mãe",
        "student-add name=\"Bia Dias\" birth=2016-04-02 level=iniciante class=\"Iniciante I\" branch=centro guardian=grd-301 costume=300 installments=3",
        "debt grd-301",
        "exit",
    ]
    .join("\n");

    shell(&dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Welcome, admin!"))
        .stdout(contains("Guardian grd-301 registered."))
        .stdout(contains("Student std-301 enrolled. Guardian balance is now R$ 1.300,00."))
        .stdout(contains("Consulta de débitos: Carla Dias (2024)"));

    assert!(dir.join("session.json").exists());
}

#[test]
fn session_is_restored_on_the_next_run() {
    let dir = common::data_dir();
    shell(&dir)
        .write_stdin("login ana@escola.com 123\nexit\n")
        .assert()
        .success();

    shell(&dir)
        .write_stdin("whoami\nlogout\nwhoami\n")
        .assert()
        .success()
        .stdout(contains("ana <ana@escola.com>"))
        .stdout(contains("Signed out."))
        .stdout(contains("Not signed in."));
}

#[test]
fn invalid_forms_report_the_field() {
    let dir = common::data_dir();
    shell(&dir)
        .write_stdin(
            "login a@b.com x\nguardian-add name=A phone=11912345678 email=a@b.com cpf=12345678900 relationship=Pai\n",
        )
        .assert()
        .success()
        .stdout(contains("name: must have at least 2 characters"));
}

#[test]
fn typos_get_a_suggestion() {
    let dir = common::data_dir();
    shell(&dir)
        .write_stdin("dashbord\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `dashbord`"))
        .stdout(contains("Suggestion: `dashboard`?"));
}

#[test]
fn config_changes_are_persisted() {
    let dir = common::data_dir();
    shell(&dir)
        .write_stdin("config set default_branch zona-sul\nconfig get default_branch\n")
        .assert()
        .success()
        .stdout(contains("Configuration updated."));

    let json = std::fs::read_to_string(dir.join("config").join("config.json")).unwrap();
    assert!(json.contains("\"zona-sul\""));

    shell(&dir)
        .write_stdin("login a@b.com x\nbranch\n")
        .assert()
        .success()
        .stdout(contains("* zona-sul"));
}

#[test]
fn notification_feed_can_be_marked_read() {
    let dir = common::data_dir();
    shell(&dir)
        .write_stdin(
            "# morning check\nlogin ana@escola.com 123\nnotifications\nnotifications read\nnotifications\n",
        )
        .assert()
        .success()
        .stdout(contains("Notificações (2 não lidas)"))
        .stdout(contains("[aviso] Mensalidades a receber - Há 2 horas"))
        .stdout(contains("2 notification(s) marked as read."))
        .stdout(contains("Notificações (0 não lidas)"));
}
