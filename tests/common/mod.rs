use assert_cmd::Command;

pub fn emx_cmd() -> Command {
    let mut cmd = Command::cargo_bin("emx").unwrap();
    cmd.env_remove("EMX_CONFIG");
    cmd
}
