//! Instruction pointers.
//!
//! An IP owns its stack-of-stacks, motion state, mode flags and fingerprint
//! overrides. Funge-space is owned by the scheduler and lent to the IP for
//! the duration of each step.

use std::fmt;

use nfunge_core::{Space, SpaceResult, StackMode, StackOfStacks, Value, Vector, BLANK};
use tracing::{debug, trace};

use crate::error::{OpError, OpResult, VmError};
use crate::exec::{Ctx, Env};
use crate::fingerprint::{FingerprintRegistry, InstanceStore, Instancing};
use crate::instruction::{display_code, OpFn};

pub const QUOTE: Value = b'"' as Value;
pub const COMMENT: Value = b';' as Value;

const LETTERS: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpId(pub u64);

impl fmt::Display for IpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ip#{}", self.0)
    }
}

/// Independent mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IpFlags {
    /// Cells are pushed as characters until the closing quote.
    pub string: bool,
    /// Direction changes add to the delta instead of replacing it.
    pub hover: bool,
    /// Pushes go to the bottom of the stack.
    pub invert: bool,
    /// Pops come from the bottom of the stack.
    pub queue: bool,
    /// Bracket instructions rewrite their cell to the mirrored character.
    pub switch: bool,
}

impl IpFlags {
    pub fn stack_mode(&self) -> StackMode {
        StackMode {
            invert: self.invert,
            queue: self.queue,
        }
    }
}

/// An instruction bound to a letter by a loaded fingerprint.
#[derive(Clone, Copy)]
pub struct Binding {
    pub code: u32,
    pub handler: OpFn,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binding({:#010x})", self.code)
    }
}

/// Index of an uppercase letter into the override stacks.
pub fn letter_index(code: Value) -> Option<usize> {
    u8::try_from(code)
        .ok()
        .filter(u8::is_ascii_uppercase)
        .map(|b| (b - b'A') as usize)
}

#[derive(Debug)]
pub struct InstructionPointer {
    pub id: IpId,
    pub dimensions: usize,
    pub stacks: StackOfStacks,
    pub position: Vector,
    pub delta: Vector,
    pub storage_offset: Vector,
    pub flags: IpFlags,
    pub alive: bool,
    overrides: [Vec<Binding>; LETTERS],
    instances: InstanceStore,
    quit: Option<Value>,
}

impl InstructionPointer {
    /// A fresh IP at the origin heading east.
    pub fn new(id: IpId, dimensions: usize) -> Self {
        Self {
            id,
            dimensions: dimensions.max(1),
            stacks: StackOfStacks::new(),
            position: Vector::zero(),
            delta: Vector::unit(0, 1),
            storage_offset: Vector::zero(),
            flags: IpFlags::default(),
            alive: true,
            overrides: std::array::from_fn(|_| Vec::new()),
            instances: InstanceStore::default(),
            quit: None,
        }
    }

    // =========================================================================
    // Stack access under the current mode flags
    // =========================================================================

    pub fn push(&mut self, value: Value) {
        let mode = self.flags.stack_mode();
        self.stacks.toss_mut().push(value, mode);
    }

    pub fn pop(&mut self) -> Value {
        let mode = self.flags.stack_mode();
        self.stacks.toss_mut().pop(mode)
    }

    pub fn push_vector(&mut self, v: &Vector) {
        let (mode, dim) = (self.flags.stack_mode(), self.dimensions);
        self.stacks.toss_mut().push_vector(v, dim, mode);
    }

    pub fn pop_vector(&mut self) -> Vector {
        let (mode, dim) = (self.flags.stack_mode(), self.dimensions);
        self.stacks.toss_mut().pop_vector(dim, mode)
    }

    pub fn push_string(&mut self, s: &str) {
        let mode = self.flags.stack_mode();
        self.stacks.toss_mut().push_string(s, mode);
    }

    pub fn pop_string(&mut self) -> String {
        let mode = self.flags.stack_mode();
        self.stacks.toss_mut().pop_string(mode)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn reflect(&mut self) {
        self.delta = self.delta.reverse();
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Asks the scheduler to stop everything with `code`.
    pub fn request_quit(&mut self, code: Value) {
        self.quit = Some(code);
        self.alive = false;
    }

    pub fn quit_requested(&self) -> Option<Value> {
        self.quit
    }

    /// A child IP: deep copies of the stacks and override stacks, the same
    /// position and flags, the opposite delta and fresh fingerprint state.
    /// The child is moved onto its first executable cell.
    pub fn split(&self, id: IpId, space: &Space) -> SpaceResult<InstructionPointer> {
        let mut child = InstructionPointer {
            id,
            dimensions: self.dimensions,
            stacks: self.stacks.clone(),
            position: self.position.clone(),
            delta: self.delta.reverse(),
            storage_offset: self.storage_offset.clone(),
            flags: self.flags,
            alive: true,
            overrides: self.overrides.clone(),
            instances: InstanceStore::default(),
            quit: None,
        };
        child.position = child.next_position(space)?;
        Ok(child)
    }

    // =========================================================================
    // Motion
    // =========================================================================

    /// The position the IP moves to after executing the current cell.
    ///
    /// Blank cells and `;`-delimited comments are skipped. In string mode
    /// comments are not recognised and blanks are skipped only when the IP
    /// starts on a blank, so a run of spaces reads as a single space.
    pub fn next_position(&self, space: &Space) -> SpaceResult<Vector> {
        if self.delta.is_zero() {
            return Ok(self.position.clone());
        }
        let start_blank = space.get(&self.position)? == BLANK;
        self.scan(space, &self.position + &self.delta, start_blank)
    }

    /// Moves onto the first executable cell at or after the current
    /// position. Used for freshly created IPs.
    pub fn settle(&mut self, space: &Space) -> SpaceResult<()> {
        if self.delta.is_zero() {
            return Ok(());
        }
        let cell = space.get(&self.position)?;
        if cell == BLANK || cell == COMMENT {
            self.position = self.scan(space, self.position.clone(), true)?;
        }
        Ok(())
    }

    /// One cell along the delta, wrapping at the edge. Does not skip
    /// anything.
    pub fn raw_advance(&self, space: &Space) -> Vector {
        let next = &self.position + &self.delta;
        if space.out_of_bounds(&next) {
            space.wrap(&next, &self.delta)
        } else {
            next
        }
    }

    fn scan(&self, space: &Space, mut candidate: Vector, start_blank: bool) -> SpaceResult<Vector> {
        let mut in_comment = false;
        let mut first_wrap: Option<Vector> = None;
        loop {
            if space.out_of_bounds(&candidate) {
                candidate = space.wrap(&candidate, &self.delta);
                if space.out_of_bounds(&candidate) {
                    // the path never meets an occupied cell
                    return Ok(candidate);
                }
                match &first_wrap {
                    Some(w) if *w == candidate => return Ok(candidate),
                    Some(_) => {}
                    None => first_wrap = Some(candidate.clone()),
                }
            }
            let cell = space.get(&candidate)?;
            if cell == COMMENT && !self.flags.string {
                in_comment = !in_comment;
            } else if !in_comment && !(cell == BLANK && (!self.flags.string || start_blank)) {
                return Ok(candidate);
            }
            candidate = &candidate + &self.delta;
        }
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Executes the current cell and moves on.
    ///
    /// Local failures reflect the IP; only structural errors are returned.
    pub fn step(&mut self, env: &mut Env) -> Result<(), VmError> {
        let cell = env.space.get(&self.position)?;
        let result = if self.flags.string {
            if cell == QUOTE {
                self.flags.string = false;
            } else {
                self.push(cell);
            }
            Ok(())
        } else {
            trace!(ip = %self.id, at = %self.position, op = %display_code(cell), "execute");
            Ctx::new(self, env).dispatch(cell)
        };

        match result {
            Ok(()) => {}
            Err(OpError::Fatal(e)) => return Err(e),
            Err(e) => {
                debug!(ip = %self.id, at = %self.position, op = %display_code(cell), error = %e, "reflect");
                self.reflect();
            }
        }

        if self.alive {
            self.position = self.next_position(&env.space)?;
        }
        Ok(())
    }

    // =========================================================================
    // Fingerprints
    // =========================================================================

    /// Top binding for an uppercase letter.
    pub fn binding(&self, letter: usize) -> Option<&Binding> {
        self.overrides.get(letter).and_then(|s| s.last())
    }

    /// Number of bindings stacked on an uppercase letter.
    pub fn override_depth(&self, letter: char) -> usize {
        letter_index(letter as Value).map_or(0, |i| self.overrides[i].len())
    }

    pub fn instances_mut(&mut self) -> &mut InstanceStore {
        &mut self.instances
    }

    pub fn load_fingerprint(
        &mut self,
        code: u32,
        registry: &FingerprintRegistry,
        shared: &mut InstanceStore,
    ) -> OpResult {
        let fp = registry.get(code).ok_or(OpError::UnknownFingerprint(code))?;
        match fp.instancing {
            Instancing::Global => {}
            Instancing::Interpreter => shared.ensure(code, registry)?,
            Instancing::Ip => self.instances.ensure(code, registry)?,
            Instancing::Space => {
                return Err(OpError::Fatal(VmError::UnsupportedInstancing {
                    name: fp.name,
                    instancing: fp.instancing,
                }))
            }
        }
        for &(letter, handler) in fp.bindings {
            if let Some(i) = letter_index(letter as Value) {
                self.overrides[i].push(Binding { code, handler });
            }
        }
        debug!(ip = %self.id, fingerprint = fp.name, "load fingerprint");
        Ok(())
    }

    /// Pops the bindings pushed by a matching load. Fails without touching
    /// any override stack unless every letter of the fingerprint has a
    /// binding from `code` on top.
    pub fn unload_fingerprint(&mut self, code: u32, registry: &FingerprintRegistry) -> OpResult {
        let fp = registry.get(code).ok_or(OpError::UnknownFingerprint(code))?;
        let letters: Vec<usize> = fp
            .bindings
            .iter()
            .filter_map(|&(letter, _)| letter_index(letter as Value))
            .collect();
        let on_top = letters
            .iter()
            .all(|&i| self.overrides[i].last().is_some_and(|b| b.code == code));
        if !on_top {
            return Err(OpError::NotLoaded(code));
        }
        for i in letters {
            self.overrides[i].pop();
        }
        debug!(ip = %self.id, fingerprint = fp.name, "unload fingerprint");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::handprint;
    use pretty_assertions::assert_eq;

    fn space_from(dims: usize, text: &str) -> Space {
        let mut space = Space::new(dims);
        space.load(&Vector::zero(), text.as_bytes(), false).unwrap();
        space
    }

    fn ip_at(x: Value, dx: Value) -> InstructionPointer {
        let mut ip = InstructionPointer::new(IpId(0), 2);
        ip.position = Vector::from([x, 0]);
        ip.delta = Vector::from([dx, 0]);
        ip
    }

    #[test]
    fn test_next_position_skips_blanks_and_comments() {
        let space = space_from(2, "a  ;xy; b");
        let ip = ip_at(0, 1);
        assert_eq!(ip.next_position(&space).unwrap(), Vector::from([8, 0]));
    }

    #[test]
    fn test_next_position_wraps() {
        let space = space_from(2, "ab  c");
        let ip = ip_at(4, 1);
        assert_eq!(ip.next_position(&space).unwrap(), Vector::from([0, 0]));
        let ip = ip_at(0, -1);
        assert_eq!(ip.next_position(&space).unwrap(), Vector::from([4, 0]));
    }

    #[test]
    fn test_comment_across_wrap() {
        let space = space_from(2, "b;x;a;");
        // leaving `a` eastwards enters a comment that closes after wrapping
        let ip = ip_at(4, 1);
        assert_eq!(ip.next_position(&space).unwrap(), Vector::from([2, 0]));
    }

    #[test]
    fn test_string_mode_collapses_spaces() {
        let space = space_from(2, "\"a   b");
        let mut ip = ip_at(1, 1);
        ip.flags.string = true;
        // from a non-blank the first blank is visited
        assert_eq!(ip.next_position(&space).unwrap(), Vector::from([2, 0]));
        // from a blank the rest of the run is skipped
        ip.position = Vector::from([2, 0]);
        assert_eq!(ip.next_position(&space).unwrap(), Vector::from([5, 0]));
        // comments are literal in string mode
        let space = space_from(2, "a;b");
        let mut ip = ip_at(0, 1);
        ip.flags.string = true;
        assert_eq!(ip.next_position(&space).unwrap(), Vector::from([1, 0]));
    }

    #[test]
    fn test_next_position_terminates_on_empty_lines() {
        let space = space_from(2, "a\n\n;");
        // row 2 holds only an unterminated comment
        let mut ip = ip_at(0, 1);
        ip.position = Vector::from([0, 2]);
        let p = ip.next_position(&space).unwrap();
        assert_eq!(p.get(1), 2);
        // zero delta stays put
        let mut ip = ip_at(0, 0);
        ip.delta = Vector::zero();
        assert_eq!(ip.next_position(&space).unwrap(), Vector::zero());
    }

    #[test]
    fn test_settle() {
        let space = space_from(2, ";x; >");
        let mut ip = InstructionPointer::new(IpId(0), 2);
        ip.settle(&space).unwrap();
        assert_eq!(ip.position, Vector::from([4, 0]));
    }

    #[test]
    fn test_split_isolates_stacks() {
        let space = space_from(2, "ab t cd");
        let mut parent = ip_at(3, 1);
        parent.push(1);
        parent.push(2);
        parent.stacks.new_stack(1).unwrap();
        parent.flags.hover = true;

        let mut child = parent.split(IpId(7), &space).unwrap();
        assert_eq!(child.id, IpId(7));
        assert_eq!(child.delta, Vector::from([-1, 0]));
        assert_eq!(child.position, Vector::from([1, 0]));
        assert!(child.flags.hover);
        assert_eq!(child.stacks, parent.stacks);

        child.push(99);
        child.stacks.soss_mut().unwrap().push(5, StackMode::NORMAL);
        assert_eq!(parent.stacks.toss().iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(parent.stacks.sizes().collect::<Vec<_>>(), vec![1, 1]);
    }

    #[test]
    fn test_mode_flags_drive_stack_access() {
        let mut ip = InstructionPointer::new(IpId(0), 2);
        ip.push(1);
        ip.push(2);
        ip.flags.queue = true;
        assert_eq!(ip.pop(), 1);
        ip.flags.queue = false;
        ip.flags.invert = true;
        ip.push(3);
        assert_eq!(ip.stacks.toss().iter().collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn test_load_and_unload_fingerprint() {
        let registry = FingerprintRegistry::standard();
        let mut shared = InstanceStore::default();
        let mut ip = InstructionPointer::new(IpId(0), 2);
        let roma = handprint("ROMA");

        ip.load_fingerprint(roma, &registry, &mut shared).unwrap();
        ip.load_fingerprint(roma, &registry, &mut shared).unwrap();
        assert_eq!(ip.override_depth('M'), 2);
        assert_eq!(ip.override_depth('A'), 0);

        ip.unload_fingerprint(roma, &registry).unwrap();
        assert_eq!(ip.override_depth('M'), 1);

        // a code that was never loaded leaves everything untouched
        let null = handprint("NULL");
        assert!(matches!(ip.unload_fingerprint(null, &registry), Err(OpError::NotLoaded(_))));
        assert_eq!(ip.override_depth('M'), 1);
        assert!(matches!(
            ip.load_fingerprint(handprint("NOPE"), &registry, &mut shared),
            Err(OpError::UnknownFingerprint(_))
        ));
    }

    #[test]
    fn test_unload_requires_binding_on_top() {
        let registry = FingerprintRegistry::standard();
        let mut shared = InstanceStore::default();
        let mut ip = InstructionPointer::new(IpId(0), 2);
        let (roma, null) = (handprint("ROMA"), handprint("NULL"));
        ip.load_fingerprint(roma, &registry, &mut shared).unwrap();
        ip.load_fingerprint(null, &registry, &mut shared).unwrap();
        // NULL now covers every ROMA letter
        assert!(ip.unload_fingerprint(roma, &registry).is_err());
        assert_eq!(ip.override_depth('I'), 2);
        ip.unload_fingerprint(null, &registry).unwrap();
        ip.unload_fingerprint(roma, &registry).unwrap();
        assert_eq!(ip.override_depth('I'), 0);
    }

    #[test]
    fn test_instances_follow_instancing() {
        let registry = FingerprintRegistry::standard();
        let mut shared = InstanceStore::default();
        let mut ip = InstructionPointer::new(IpId(0), 2);
        let (refc, hrti) = (handprint("REFC"), handprint("HRTI"));
        ip.load_fingerprint(refc, &registry, &mut shared).unwrap();
        ip.load_fingerprint(hrti, &registry, &mut shared).unwrap();
        assert!(shared.contains(refc));
        assert!(!shared.contains(hrti));
        assert!(ip.instances.contains(hrti));

        let space = Space::new(2);
        let child = ip.split(IpId(1), &space).unwrap();
        assert!(child.instances.is_empty());
        assert_eq!(child.override_depth('T'), 1);
    }
}
