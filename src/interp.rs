//! The op interpreter: replays an op list against a [`Surface`].
//!
//! Failure isolation is per op. Each op is decoded and applied on its own; an
//! unknown name is a warning, a bad argument list or a rejected canvas call is
//! an error, and in every case interpretation moves on to the next op.

#[cfg(test)]
#[path = "interp_test.rs"]
mod interp_test;

use std::ops::AddAssign;

use crate::command::Directive;
use crate::instance::render_instances;
use crate::op::{Op, Templates};
use crate::surface::Surface;

/// Tally of what an interpretation pass did.
///
/// Ops run inside template instances are counted too, so `applied` can exceed
/// the length of the list that was passed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    /// Ops (and instance batches) applied.
    pub applied: usize,
    /// Ops skipped because they were unknown, malformed, or failed.
    pub skipped: usize,
}

impl AddAssign for Report {
    fn add_assign(&mut self, rhs: Self) {
        self.applied += rhs.applied;
        self.skipped += rhs.skipped;
    }
}

/// Apply `ops` to `surface` in order.
pub fn execute<S: Surface + ?Sized>(surface: &mut S, templates: &Templates, ops: &[Op]) -> Report {
    execute_nested(surface, templates, ops, &mut Vec::new())
}

/// [`execute`] inside the expansion of the templates named in `active`.
pub(crate) fn execute_nested<S: Surface + ?Sized>(
    surface: &mut S,
    templates: &Templates,
    ops: &[Op],
    active: &mut Vec<String>,
) -> Report {
    let mut report = Report::default();
    for op in ops {
        match Directive::decode(op) {
            Ok(Directive::Draw(command)) => match surface.apply(&command) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    log::error!("error executing op {} {:?}: {err}", op.name, op.args);
                    report.skipped += 1;
                }
            },
            Ok(Directive::Instances(batch)) => report += render_instances(surface, templates, &batch, active),
            Err(err) if err.is_unknown() => {
                log::warn!("{err}");
                report.skipped += 1;
            }
            Err(err) => {
                log::error!("error executing op {} {:?}: {err}", op.name, op.args);
                report.skipped += 1;
            }
        }
    }
    report
}
