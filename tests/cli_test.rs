use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::process::{Command,Stdio}; // Run programs
use std::io::Write;

/// run a subcommand with `input` piped in, returning stdout
fn pipe(args: &[&str],input: Vec<u8>) -> Vec<u8> {
    let mut cmd = Command::cargo_bin("nextbasic").expect("binary not found");
    let mut child = cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn child process");
    let mut stdin = child.stdin.take().expect("Failed to open stdin");
    std::thread::spawn(move || {
        stdin.write_all(&input).expect("Failed to write to stdin");
    });
    let output = child.wait_with_output().expect("Failed to read stdout");
    assert!(output.status.success());
    output.stdout
}

#[test]
fn tokenize_raw() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog = "10 LET a=1.5\n20 PRINT a\n";
    let toks = hex::decode("000A0D00F1613D312E350E81400000000D00140300F5610D")?;
    let output = pipe(&["tokenize","--raw"],test_prog.as_bytes().to_vec());
    assert_eq!(output,toks);
    Ok(())
}

#[test]
fn tokenize_framed() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog = "#program demo\n#autostart 10\n10 CLS\n";
    let output = pipe(&["tok"],test_prog.as_bytes().to_vec());
    assert_eq!(output.len(),134);
    assert_eq!(&output[0..8],b"PLUS3DOS");
    assert_eq!(&output[18..20],&[10,0]);
    assert_eq!(hex::encode_upper(&output[128..]),"000A0200FB0D");
    Ok(())
}

#[test]
fn tokenize_autostart_override() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog = "#autostart 10\n10 CLS\n20 STOP\n";
    let output = pipe(&["tokenize","-a","20"],test_prog.as_bytes().to_vec());
    assert_eq!(&output[18..20],&[20,0]);
    Ok(())
}

#[test]
fn frame_binary() -> Result<(), Box<dyn std::error::Error>> {
    let toks = hex::decode("000A0200FB0D")?;
    let output = pipe(&["tokenize","--binary","-a","10"],toks);
    assert_eq!(output.len(),134);
    assert_eq!(&output[0..8],b"PLUS3DOS");
    assert_eq!(&output[18..20],&[10,0]);
    assert_eq!(hex::encode_upper(&output[128..]),"000A0200FB0D");
    let listing = pipe(&["detokenize"],output);
    assert_eq!(String::from_utf8_lossy(&listing),"#autostart 10\n  10 CLS\n");
    Ok(())
}

#[test]
fn frame_binary_drops_trailing_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let toks = hex::decode("000A0200FB0D80AA")?;
    let output = pipe(&["tokenize","-b"],toks);
    assert_eq!(output.len(),134);
    assert_eq!(&output[18..20],&[0,0x80]);
    assert_eq!(hex::encode_upper(&output[128..]),"000A0200FB0D");
    Ok(())
}

#[test]
fn frame_binary_truncated() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("tokenize").arg("--binary")
        .write_stdin(hex::decode("000A0900F5")?)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn frame_binary_not_raw() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("tokenize").arg("--binary").arg("--raw")
        .write_stdin(hex::decode("000A0200FB0D")?)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn detokenize_bare() -> Result<(), Box<dyn std::error::Error>> {
    let expected = "  10 LET a=1.5\n  20 PRINT a\n";
    let toks = hex::decode("000A0D00F1613D312E350E81400000000D00140300F5610D")?;
    let output = pipe(&["detokenize"],toks);
    assert_eq!(String::from_utf8_lossy(&output),expected);
    Ok(())
}

#[test]
fn detokenize_framed() -> Result<(), Box<dyn std::error::Error>> {
    let test_prog = "#autostart 10\n10 CLS\n20 GO TO 10\n";
    let framed = pipe(&["tokenize"],test_prog.as_bytes().to_vec());
    let output = pipe(&["dtok","-n","demo"],framed);
    assert_eq!(String::from_utf8_lossy(&output),"#program demo\n#autostart 10\n  10 CLS\n  20 GO TO 10\n");
    Ok(())
}

#[test]
fn renumber_step() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("renumber").arg("-s").arg("5")
        .write_stdin("10 GO TO 30\n20 PRINT\n30 STOP\n")
        .assert()
        .success()
        .stdout("   5 GO TO 15\n  10 PRINT\n  15 STOP\n");
    Ok(())
}

#[test]
fn renumber_nothing_to_do() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    let test_prog = "  10 CLS\n  20 GO TO 10\n";
    cmd.arg("renumber")
        .write_stdin(test_prog)
        .assert()
        .success()
        .stdout(test_prog);
    Ok(())
}

#[test]
fn renumber_unresolved() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("renumber").arg("-s").arg("5")
        .write_stdin("10 GO TO 40\n20 STOP\n")
        .assert()
        .success()
        .stdout("   5 GO TO 40\n  10 STOP\n")
        .stderr(predicate::str::contains("missing line 40"));
    Ok(())
}

#[test]
fn renumber_with_settings() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("renumber").arg("--settings").arg(r#"{"renumber":{"step":2},"detokenizer":{"lineNumberWidth":0}}"#)
        .write_stdin("10 CLS\n20 GO TO 10\n")
        .assert()
        .success()
        .stdout("2 CLS\n4 GO TO 2\n");
    Ok(())
}

#[test]
fn bad_settings() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("renumber").arg("--settings").arg("{renumber")
        .write_stdin("10 CLS\n")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn loader() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("nextbasic")?;
    let output = cmd.arg("loader").arg("-n").arg("game").output()?;
    assert!(output.status.success());
    assert_eq!(&output.stdout[0..8],b"PLUS3DOS");
    assert_eq!(&output.stdout[18..20],&[0,0]);
    let listing = pipe(&["detokenize"],output.stdout);
    let expected = "#autostart\n  10 CLEAR 32767\n  20 LOAD \"game\"CODE 32768\n  30 RANDOMIZE USR 32768\n";
    assert_eq!(String::from_utf8_lossy(&listing),expected);
    Ok(())
}

#[test]
fn bad_line_number() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("tokenize").arg("--raw")
        .write_stdin("10000 CLS\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("10000"));
    Ok(())
}

#[test]
fn bad_checksum() -> Result<(), Box<dyn std::error::Error>> {
    let mut framed = pipe(&["tokenize"],b"10 CLS\n".to_vec());
    framed[127] = framed[127].wrapping_add(1);
    let mut cmd = assert_cmd::Command::cargo_bin("nextbasic")?;
    cmd.arg("detokenize")
        .write_stdin(framed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum"));
    Ok(())
}

#[test]
fn invalid_shell() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("nextbasic")?;
    cmd.arg("completions").arg("-s").arg("csh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("csh"));
    Ok(())
}
