//! Discovery of command instructions from the executables on PATH, behind
//! small port traits so tests can supply their own environment and disk.

use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use crate::language::{command_strat, TaxStrat};

use super::StateMachine;

pub type InstructionId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirFile {
    pub path: PathBuf,
    pub name: String,
    pub can_execute: bool,
}

pub trait Disk {
    fn ls(&self, path: &Path) -> io::Result<Vec<DirFile>>;
}

pub trait Env {
    fn var(&self, name: &str) -> Option<String>;
}

pub trait IdGenerator {
    fn next_id(&mut self) -> InstructionId;
}

#[derive(Debug, Default)]
pub struct FileSystemDisk;

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata
        .permissions()
        .mode()
        & 0o111
        != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

impl Disk for FileSystemDisk {
    fn ls(&self, path: &Path) -> io::Result<Vec<DirFile>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            files.push(DirFile {
                path: entry.path(),
                name: entry
                    .file_name()
                    .to_string_lossy()
                    .to_string(),
                can_execute: is_executable(&metadata),
            });
        }
        Ok(files)
    }
}

#[derive(Debug, Default)]
pub struct ShellEnv;

impl Env for ShellEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    index: InstructionId,
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> InstructionId {
        self.index += 1;
        self.index
    }
}

#[derive(Debug, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> InstructionId {
        rand::thread_rng().gen()
    }
}

/// One executable discovered on PATH, registered as a known command
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInstr {
    pub id: InstructionId,
    pub name: String,
    pub path: PathBuf,
}

/// The production state machine: answers command strategy for every
/// executable found on PATH, and nothing for anything else.
pub struct RootStateMachine<E, D, G> {
    env: E,
    disk: D,
    id_gen: G,
    command_instrs: Vec<CommandInstr>,
}

impl<E: Env, D: Disk, G: IdGenerator> RootStateMachine<E, D, G> {
    pub fn new(env: E, disk: D, id_gen: G) -> RootStateMachine<E, D, G> {
        RootStateMachine {
            env,
            disk,
            id_gen,
            command_instrs: vec![],
        }
    }

    /// Walk the colon-separated PATH directories and register every regular
    /// executable file. Directories that cannot be listed are skipped.
    pub fn init(&mut self) {
        let path = self
            .env
            .var("PATH")
            .unwrap_or_default();
        for dir in path.split(':') {
            if dir.is_empty() {
                continue;
            }
            let files = match self
                .disk
                .ls(Path::new(dir))
            {
                Ok(files) => files,
                Err(error) => {
                    debug!("skipping {}: {}", dir, error);
                    continue;
                }
            };
            for file in files {
                if !file.can_execute {
                    continue;
                }
                let id = self
                    .id_gen
                    .next_id();
                self.command_instrs
                    .push(CommandInstr {
                        id,
                        name: file.name,
                        path: file.path,
                    });
            }
        }
        debug!(
            "registered {} command instructions",
            self.command_instrs
                .len()
        );
    }

    /// The first registered command with this name, mirroring how the shell
    /// resolves PATH collisions.
    pub fn get_cmd_instr(&self, name: &str) -> Option<&CommandInstr> {
        self.command_instrs
            .iter()
            .find(|instr| instr.name == name)
    }
}

impl<E: Env, D: Disk, G: IdGenerator> StateMachine for RootStateMachine<E, D, G> {
    fn tax_strat(&self, instr_name: &str) -> Option<TaxStrat> {
        self.get_cmd_instr(instr_name)
            .map(|_| command_strat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_sequential_ids_count_from_one() {
        let mut id_gen = SequentialIdGenerator::default();
        assert_eq!(id_gen.next_id(), 1);
        assert_eq!(id_gen.next_id(), 2);
        assert_eq!(id_gen.next_id(), 3);
    }

    #[test]
    fn check_random_ids_vary() {
        let mut id_gen = RandomIdGenerator;
        let ids: Vec<InstructionId> = (0..10)
            .map(|_| id_gen.next_id())
            .collect();
        assert!(ids
            .iter()
            .any(|id| *id != ids[0]));
    }
}
