//! End-to-end scenarios over a seeded VFS.

use serde_json::json;
use vshell::shell::{Flow, Identity, Interpreter, Output, Session};
use vshell::tree::build;

fn home_shell() -> Interpreter {
    let vfs = build(&json!({"home": {"type": "directory", "children": {"a.txt": "hello"}}})).unwrap();
    Interpreter::new(vfs, Identity::default())
}

fn run(shell: &mut Interpreter, line: &str) -> vshell::shell::Execution {
    shell.execute_line_with(line, |_| None)
}

#[test]
fn navigate_and_read() {
    let mut shell = home_shell();
    run(&mut shell, "cd home");
    assert_eq!(run(&mut shell, "pwd").stdout(), "/home");
    assert_eq!(run(&mut shell, "cat a.txt").stdout(), "hello");
    run(&mut shell, "cd ..");
    assert_eq!(run(&mut shell, "pwd").stdout(), "/");
}

#[test]
fn rmdir_refuses_non_empty_directory() {
    let mut shell = home_shell();
    let exec = run(&mut shell, "rmdir home");
    assert_eq!(exec.stderr(), "rmdir: failed to remove 'home': Directory not empty");
    let vfs = shell.vfs();
    assert!(vfs.resolve_path(vfs.root(), "/home/a.txt").is_ok());
}

#[test]
fn ls_long_shows_default_permissions() {
    let vfs = build(&json!({"dir": {"type": "directory"}, "file.txt": "abc"})).unwrap();
    let mut shell = Interpreter::new(vfs, Identity::default());
    let out = run(&mut shell, "ls -l /").stdout();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "total 2");
    assert!(lines[1].starts_with("drwxr-xr-x"));
    assert!(lines[1].ends_with("dir/"));
    assert!(lines[2].starts_with("-rw-r--r--"));
    assert!(lines[2].ends_with("file.txt"));
}

#[test]
fn unknown_command_keeps_session_alive() {
    let mut shell = home_shell();
    let exec = run(&mut shell, "foo");
    assert_eq!(exec.output, vec![Output::Stderr("foo: command not found".to_string())]);
    assert_eq!(exec.flow, Flow::Continue);
    assert_eq!(run(&mut shell, "pwd").stdout(), "/");
}

#[test]
fn cat_prints_valid_arguments_in_order() {
    let vfs = build(&json!({"one": "1", "two": "2"})).unwrap();
    let mut shell = Interpreter::new(vfs, Identity::default());
    let exec = run(&mut shell, "cat two ghost one");
    assert_eq!(exec.stdout(), "2\n1");
    assert_eq!(exec.stderr(), "cat: ghost: No such file or directory");
}

#[test]
fn base64_seed_content_is_readable() {
    let vfs = build(&json!({"msg": {"content": "aGVsbG8=", "encoding": "base64"}})).unwrap();
    let mut shell = Interpreter::new(vfs, Identity::default());
    assert_eq!(run(&mut shell, "cat /msg").stdout(), "hello");
}

#[test]
fn scripted_session_transcript() {
    let mut session = Session::new("demo", home_shell());
    let script = "# tour\ncd home\nls\nrmdir .\ncd /\nexit 2\necho unreachable\n";
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = session
        .run_script(std::io::Cursor::new(script), &mut out, &mut err)
        .unwrap();
    assert_eq!(code, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "demo:/$ cd home\ndemo:/home$ ls\na.txt\ndemo:/home$ rmdir .\ndemo:/home$ cd /\ndemo:/$ exit 2\n"
    );
    assert_eq!(
        String::from_utf8(err).unwrap(),
        "rmdir: failed to remove '.': Cannot remove current directory\n"
    );
}
