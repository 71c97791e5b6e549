//! Round-robin scheduling of instruction pointers.
//!
//! Every tick steps each live IP once, in list order. IPs created during a
//! tick join the list when it ends, directly in front of their parent, so
//! they first run on the next tick and before the parent.

use nfunge_core::{Space, Value, Vector};
use tracing::debug;

use crate::config::VmConfig;
use crate::error::{VmError, VmResult};
use crate::exec::Env;
use crate::fingerprint::FingerprintRegistry;
use crate::host::Host;
use crate::instruction::OpTable;
use crate::ip::{InstructionPointer, IpId};

#[derive(Debug)]
pub struct Scheduler {
    env: Env,
    ips: Vec<InstructionPointer>,
    ticks: u64,
    quit: bool,
    exit_code: Value,
}

impl Scheduler {
    /// A scheduler with the standard instruction set and fingerprints.
    pub fn new(config: VmConfig, host: Host) -> Self {
        Self::with_parts(config, host, OpTable::standard(), FingerprintRegistry::standard())
    }

    pub fn with_parts(
        config: VmConfig,
        host: Host,
        ops: OpTable,
        fingerprints: FingerprintRegistry,
    ) -> Self {
        Self {
            env: Env::new(config, host, ops, fingerprints),
            ips: Vec::new(),
            ticks: 0,
            quit: false,
            exit_code: 0,
        }
    }

    /// Loads program text at the origin and starts an IP on it.
    pub fn load(&mut self, source: &[u8]) -> VmResult<IpId> {
        self.env.space.load(&Vector::zero(), source, false)?;
        self.spawn_ip()
    }

    /// Adds a fresh IP at the origin heading east, moved onto the first
    /// executable cell.
    pub fn spawn_ip(&mut self) -> VmResult<IpId> {
        let id = self.env.next_ip_id();
        let mut ip = InstructionPointer::new(id, self.env.config.dimensions);
        ip.settle(&self.env.space)?;
        debug!(ip = %id, at = %ip.position, "spawned");
        self.ips.push(ip);
        Ok(id)
    }

    pub fn space(&self) -> &Space {
        &self.env.space
    }

    pub fn space_mut(&mut self) -> &mut Space {
        &mut self.env.space
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.env.host
    }

    pub fn config(&self) -> &VmConfig {
        &self.env.config
    }

    pub fn ips(&self) -> &[InstructionPointer] {
        &self.ips
    }

    pub fn ips_mut(&mut self) -> &mut [InstructionPointer] {
        &mut self.ips
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn exit_code(&self) -> Value {
        self.exit_code
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// True once nothing is left to run.
    pub fn is_finished(&self) -> bool {
        self.quit || self.ips.is_empty()
    }

    /// Steps every live IP once.
    ///
    /// An IP that quits ends the tick on the spot: later IPs do not run and
    /// pending children are dropped.
    pub fn tick(&mut self) -> VmResult<()> {
        if self.quit {
            return Ok(());
        }
        self.ticks += 1;

        for ip in self.ips.iter_mut() {
            if !ip.alive {
                continue;
            }
            ip.step(&mut self.env)?;
            if let Some(code) = ip.quit_requested() {
                debug!(ip = %ip.id, code, tick = self.ticks, "quit");
                self.quit = true;
                self.exit_code = code;
                self.env.take_spawned();
                return Ok(());
            }
        }

        for (child, parent) in self.env.take_spawned() {
            let at = self.ips.iter().position(|ip| ip.id == parent).unwrap_or(0);
            self.ips.insert(at, child);
        }
        self.ips.retain(|ip| {
            if !ip.alive {
                debug!(ip = %ip.id, "ip removed");
            }
            ip.alive
        });
        Ok(())
    }

    /// Ticks until every IP has stopped or one quits, and returns the exit
    /// code.
    pub fn run(&mut self) -> VmResult<Value> {
        while !self.is_finished() {
            if let Some(limit) = self.env.config.max_ticks {
                if self.ticks >= limit {
                    self.env.host.flush()?;
                    return Err(VmError::TickLimit(limit));
                }
            }
            self.tick()?;
        }
        self.env.host.flush()?;
        Ok(self.exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Ctx;
    use pretty_assertions::assert_eq;

    fn scheduler(source: &str) -> Scheduler {
        let mut vm = Scheduler::new(VmConfig::default(), Host::buffered(""));
        vm.load(source.as_bytes()).unwrap();
        vm
    }

    #[test]
    fn test_empty_program_halts() {
        let mut vm = Scheduler::new(VmConfig::default(), Host::buffered(""));
        assert_eq!(vm.run().unwrap(), 0);
        assert_eq!(vm.tick_count(), 0);
    }

    #[test]
    fn test_children_run_before_parent() {
        // the child heads west, wraps and stops on `@` at the far end
        let mut vm = scheduler("t1.@");
        vm.tick().unwrap();
        let ids: Vec<_> = vm.ips().iter().map(|ip| ip.id).collect();
        assert_eq!(ids, vec![IpId(1), IpId(0)]);
        assert_eq!(vm.ips()[0].position, Vector::from([3, 0]));
        assert_eq!(vm.ips()[1].position, Vector::from([1, 0]));
    }

    #[test]
    fn test_quit_stops_the_tick() {
        // two IPs walk the same row; the first quits on the second tick
        let mut vm = scheduler("7q");
        vm.ips.push(InstructionPointer::new(IpId(9), 2));
        vm.tick().unwrap();
        vm.tick().unwrap();
        assert!(vm.is_quit());
        assert_eq!(vm.exit_code(), 7);
        // the second IP ran on the first tick but not on the quitting one
        assert_eq!(vm.ips()[1].stacks.toss().iter().collect::<Vec<_>>(), vec![7]);
        let ticks = vm.tick_count();
        vm.tick().unwrap();
        assert_eq!(vm.tick_count(), ticks);
    }

    #[test]
    fn test_tick_limit() {
        let mut vm = Scheduler::new(
            VmConfig::default().with_max_ticks(10),
            Host::buffered(""),
        );
        vm.load(b">").unwrap();
        assert!(matches!(vm.run(), Err(VmError::TickLimit(10))));
        assert_eq!(vm.tick_count(), 10);
    }

    #[test]
    fn test_dead_ips_are_dropped() {
        let mut vm = scheduler("@");
        vm.tick().unwrap();
        assert!(vm.ips().is_empty());
        assert!(vm.is_finished());
        assert!(!vm.is_quit());
    }

    #[test]
    fn test_put_is_seen_within_the_tick() {
        // the first IP writes 'A' at (5,1); the second reads it back on the
        // same tick
        let mut vm = scheduler("p  g");
        vm.ips[0].push('A' as Value);
        vm.ips[0].push(5);
        vm.ips[0].push(1);
        let mut reader = InstructionPointer::new(IpId(9), 2);
        reader.position = Vector::from([3, 0]);
        reader.push(5);
        reader.push(1);
        vm.ips.push(reader);

        vm.tick().unwrap();
        assert_eq!(
            vm.ips()[1].stacks.toss().iter().collect::<Vec<_>>(),
            vec!['A' as Value]
        );
    }

    #[test]
    fn test_orphan_child_goes_to_the_head() {
        let mut vm = scheduler(">");
        let mut stray = InstructionPointer::new(IpId(42), 2);
        let child = InstructionPointer::new(IpId(43), 2);
        Ctx::new(&mut stray, &mut vm.env).spawn(child);
        vm.tick().unwrap();
        let ids: Vec<_> = vm.ips().iter().map(|ip| ip.id).collect();
        assert_eq!(ids, vec![IpId(43), IpId(0)]);
    }
}
