//! Magic Chain
//!
//! A composable pipeline of fallible unary stages.
//!
//! Responsibilities:
//! - Feed each stage's output into the next stage
//! - Stop early when a condition holds for the carry
//! - Adapt every stage through a transformer before it runs
//! - Recover from stage failures with an error handler
//! - Map the final carry before returning it

use std::fmt;
use std::rc::Rc;

/// A single stage of a chain.
pub type Link<'a, T, E> = Rc<dyn Fn(T) -> Result<T, E> + 'a>;

/// Wrap a closure as a chain stage.
pub fn link<'a, T, E>(f: impl Fn(T) -> Result<T, E> + 'a) -> Link<'a, T, E> {
    Rc::new(f)
}

type Until<'a, T> = Rc<dyn Fn(&T) -> bool + 'a>;
type Each<'a, T, E> = Rc<dyn Fn(Link<'a, T, E>) -> Link<'a, T, E> + 'a>;
type Then<'a, T> = Rc<dyn Fn(T) -> T + 'a>;

/// Error recovery: a snapshot of the carry is taken before each stage so the
/// handler can receive it after the stage consumed the original.
struct Recovery<'a, T, E> {
    snapshot: fn(&T) -> T,
    handler: Rc<dyn Fn(E, T, &Link<'a, T, E>) -> T + 'a>,
}

/// An ordered pipeline of stages.
pub struct Chain<'a, T, E> {
    links: Vec<Link<'a, T, E>>,
    until: Option<Until<'a, T>>,
    each: Option<Each<'a, T, E>>,
    recovery: Option<Recovery<'a, T, E>>,
    then: Option<Then<'a, T>>,
}

impl<'a, T, E> Default for Chain<'a, T, E> {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            until: None,
            each: None,
            recovery: None,
            then: None,
        }
    }
}

impl<'a, T, E> fmt::Debug for Chain<'a, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("links", &self.links.len())
            .field("until", &self.until.is_some())
            .field("each", &self.each.is_some())
            .field("on_error", &self.recovery.is_some())
            .field("then", &self.then.is_some())
            .finish()
    }
}

impl<'a, T, E> Chain<'a, T, E> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain from a sequence of stages.
    pub fn together(links: impl IntoIterator<Item = Link<'a, T, E>>) -> Self {
        Self::new().extend(links)
    }

    /// Append a stage.
    pub fn push(mut self, stage: impl Fn(T) -> Result<T, E> + 'a) -> Self {
        self.links.push(Rc::new(stage));
        self
    }

    /// Append already wrapped stages.
    pub fn extend(mut self, links: impl IntoIterator<Item = Link<'a, T, E>>) -> Self {
        self.links.extend(links);
        self
    }

    /// Stop before the next stage once `condition` holds for the carry.
    pub fn until(mut self, condition: impl Fn(&T) -> bool + 'a) -> Self {
        self.until = Some(Rc::new(condition));
        self
    }

    /// Transform every stage into a new stage right before it runs.
    pub fn each(mut self, transformer: impl Fn(Link<'a, T, E>) -> Link<'a, T, E> + 'a) -> Self {
        self.each = Some(Rc::new(transformer));
        self
    }

    /// Map the final carry before it is returned.
    pub fn then(mut self, finalizer: impl Fn(T) -> T + 'a) -> Self {
        self.then = Some(Rc::new(finalizer));
        self
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Run every stage in order, starting from `input`.
    ///
    /// Each iteration checks `until` first, then applies `each`, then invokes
    /// the stage.
    pub fn run(&self, input: T) -> Result<T, E> {
        let mut carry = input;

        for stage in &self.links {
            if let Some(until) = &self.until {
                if until(&carry) {
                    return Ok(self.resolve(carry));
                }
            }

            let stage = match &self.each {
                Some(each) => each(Rc::clone(stage)),
                None => Rc::clone(stage),
            };

            carry = match &self.recovery {
                Some(recovery) => {
                    let saved = (recovery.snapshot)(&carry);
                    match stage(carry) {
                        Ok(next) => next,
                        Err(err) => (recovery.handler)(err, saved, &stage),
                    }
                }
                None => stage(carry)?,
            };
        }

        Ok(self.resolve(carry))
    }

    fn resolve(&self, carry: T) -> T {
        match &self.then {
            Some(then) => then(carry),
            None => carry,
        }
    }
}

impl<'a, T: Clone + 'a, E: 'a> Chain<'a, T, E> {
    /// Recover from failing stages. The handler receives the error, the carry
    /// the stage was given, and the stage itself; its return value becomes the
    /// new carry and the chain continues.
    pub fn on_error(mut self, handler: impl Fn(E, T, &Link<'a, T, E>) -> T + 'a) -> Self {
        self.recovery = Some(Recovery {
            snapshot: T::clone,
            handler: Rc::new(handler),
        });
        self
    }

    /// Run stages for their side effects only, forwarding the original carry
    /// to the next stage.
    pub fn carry_input(self) -> Self {
        self.each(|stage| {
            link(move |input: T| {
                stage(input.clone())?;
                Ok(input)
            })
        })
    }
}
