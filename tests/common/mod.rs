// ABOUTME: Shared fake host for integration tests: an in-memory screen plus service managers
// Every path lives in a tempdir and every command is recorded for assertions

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use spv::config::{Config, HostPaths};
use spv::screen::{CommandOutput, CommandRunner};
use spv::session::SessionManager;
use spv::system::SystemDetector;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningSession {
    pub pid: u32,
    pub name: String,
    pub attached: bool,
}

#[derive(Debug, Default)]
struct HostState {
    sessions: Vec<RunningSession>,
    next_pid: u32,
    enabled_units: BTreeSet<String>,
    calls: Vec<(String, Vec<String>)>,
    failing_programs: BTreeSet<String>,
    screen_missing: bool,
}

/// In-memory stand-in for `screen`, `systemctl` and the SysV/OpenRC registration tools.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        let host = Self::default();
        host.state.lock().unwrap().next_pid = 1000;
        host
    }

    /// A session launched outside spv, e.g. `other` or `spvname_build`.
    pub fn add_foreign_session(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_pid += 1;
        let pid = state.next_pid;
        state.sessions.push(RunningSession {
            pid,
            name: name.to_string(),
            attached: false,
        });
    }

    pub fn set_attached(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        for session in state.sessions.iter_mut().filter(|s| s.name == name) {
            session.attached = true;
        }
    }

    pub fn fail_program(&self, program: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_programs
            .insert(program.to_string());
    }

    pub fn uninstall_screen(&self) {
        self.state.lock().unwrap().screen_missing = true;
    }

    pub fn running(&self) -> Vec<RunningSession> {
        self.state.lock().unwrap().sessions.clone()
    }

    pub fn enabled_units(&self) -> Vec<String> {
        self.state.lock().unwrap().enabled_units.iter().cloned().collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(program, args)| format!("{} {}", program, args.join(" ")))
            .collect()
    }

    pub fn calls_to(&self, program: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(&format!("{} ", program)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn screen(state: &mut HostState, args: &[String]) -> io::Result<CommandOutput> {
        if state.screen_missing {
            return Err(io::Error::new(io::ErrorKind::NotFound, "screen: not found"));
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["-dmS", name, ..] => {
                state.next_pid += 1;
                let pid = state.next_pid;
                state.sessions.push(RunningSession {
                    pid,
                    name: name.to_string(),
                    attached: false,
                });
                Ok(CommandOutput::ok(""))
            }
            ["-S", name, "-X", "quit"] => {
                let before = state.sessions.len();
                state.sessions.retain(|s| s.name != *name && format!("{}.{}", s.pid, s.name) != *name);
                if state.sessions.len() == before {
                    Ok(CommandOutput::failed(1, "No screen session found.\n"))
                } else {
                    Ok(CommandOutput::ok(""))
                }
            }
            ["-ls"] => Ok(Self::listing(&state.sessions)),
            _ => Ok(CommandOutput::failed(1, "unsupported screen invocation")),
        }
    }

    /// Mirrors real `screen -ls`, which exits 1 whether or not sessions exist.
    fn listing(sessions: &[RunningSession]) -> CommandOutput {
        if sessions.is_empty() {
            return CommandOutput::failed(1, "No Sockets found in /run/screen/S-test.\n");
        }
        let mut out = String::from("There are screens on:\n");
        for session in sessions {
            let status = if session.attached { "Attached" } else { "Detached" };
            out.push_str(&format!(
                "\t{}.{}\t(01/01/2024 10:00:00 AM)\t({})\n",
                session.pid, session.name, status
            ));
        }
        out.push_str(&format!("{} Sockets in /run/screen/S-test.\n", sessions.len()));
        CommandOutput::failed(1, out)
    }
}

impl CommandRunner for FakeHost {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((program.to_string(), args.to_vec()));

        if state.failing_programs.contains(program) {
            return Ok(CommandOutput::failed(1, format!("{} failed", program)));
        }

        match program {
            "screen" => Self::screen(&mut state, args),
            "systemctl" => {
                match args {
                    [verb, unit] if verb == "enable" => {
                        state.enabled_units.insert(unit.clone());
                    }
                    [verb, unit] if verb == "disable" => {
                        state.enabled_units.remove(unit);
                    }
                    _ => {}
                }
                Ok(CommandOutput::ok(""))
            }
            _ => Ok(CommandOutput::ok("")),
        }
    }
}

/// Lay out marker files so the detector sees a Linux host with `init`.
pub fn seed_host(root: &Path, distro_id: &str, init: &str) {
    fs::create_dir_all(root.join("etc")).unwrap();
    fs::write(root.join("etc/os-release"), format!("NAME=\"Test\"\nID={}\n", distro_id)).unwrap();
    match init {
        "systemd" => fs::create_dir_all(root.join("run/systemd/system")).unwrap(),
        "openrc" => {
            fs::create_dir_all(root.join("sbin")).unwrap();
            fs::write(root.join("sbin/openrc"), "").unwrap();
        }
        "sysvinit" => fs::create_dir_all(root.join("etc/init.d")).unwrap(),
        _ => {}
    }
}

pub struct Sandbox {
    pub dir: TempDir,
    pub host: FakeHost,
}

impl Sandbox {
    pub fn new(distro_id: &str, init: &str) -> Self {
        let dir = TempDir::new().unwrap();
        seed_host(dir.path(), distro_id, init);
        Self {
            dir,
            host: FakeHost::new(),
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::with_dir(self.dir.path().join("config"));
        config.host = HostPaths::under(self.dir.path());
        config
    }

    pub fn manager(&self) -> SessionManager {
        self.manager_with(self.config(), "linux")
    }

    pub fn manager_with(&self, config: Config, os: &str) -> SessionManager {
        let detector = SystemDetector::with_root(self.dir.path(), os);
        SessionManager::with_parts(config, Arc::new(self.host.clone()), detector)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}
