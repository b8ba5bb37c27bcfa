//! Execution of a parsed plan.

use tracing::{debug, warn};

use crate::actions::ActionRegistry;
use crate::flags::FlagRegistry;
use crate::parser::ParsedSegment;
use crate::scope::FlagScope;

/// Status recorded for a planned action that is no longer defined.
pub(crate) const UNDEFINED_ACTION_STATUS: i32 = 1;

/// Runs every segment of `plan` in order and returns each callback's status.
///
/// Before a callback runs, the action's scoped flags are reset to their
/// defaults and then set to the values recorded for that segment, so chained
/// invocations of one action never see each other's flags. Segments are never
/// skipped or retried because an earlier one failed. The returned statuses
/// line up with `plan` by index.
pub(crate) fn dispatch(
    plan: &[ParsedSegment],
    actions: &mut ActionRegistry,
    globals: &mut FlagRegistry,
) -> Vec<i32> {
    let mut statuses = Vec::with_capacity(plan.len());

    for (index, segment) in plan.iter().enumerate() {
        let Some(action) = actions.get_mut(&segment.action) else {
            warn!(action = %segment.action, "Planned action is no longer defined");
            statuses.push(UNDEFINED_ACTION_STATUS);
            continue;
        };

        action.flags.restore_defaults();
        for (name, value) in &segment.flags {
            if let Err(err) = action.flags.set_value(name, value.clone()) {
                warn!(action = %segment.action, flag = %name, error = %err, "Could not restore segment flag");
            }
        }

        debug!(index, action = %segment.action, arguments = ?segment.arguments, "Running action");
        let mut scope = FlagScope::action(&mut action.flags, globals);
        let status = (action.callback)(&mut scope, &segment.arguments);
        debug!(index, action = %segment.action, status, "Action finished");
        statuses.push(status);
    }

    statuses
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::actions::Action;
    use crate::flags::{Flag, Scope};
    use crate::value::FlagValue;

    fn segment(action: &str, arguments: &[&str]) -> ParsedSegment {
        ParsedSegment {
            action: action.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            flags: Default::default(),
        }
    }

    #[test]
    fn test_runs_segments_in_order_with_arguments() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut actions = ActionRegistry::new();
        let log = Rc::clone(&seen);
        actions
            .define(
                Action::new("say", 1, move |_, args| {
                    log.borrow_mut().push(args[0].clone());
                    0
                })
                .chainable(),
            )
            .unwrap();
        let mut globals = FlagRegistry::new(Scope::Global);

        let plan = vec![segment("say", &["one"]), segment("say", &["two"])];
        let statuses = dispatch(&plan, &mut actions, &mut globals);

        assert_eq!(statuses, vec![0, 0]);
        assert_eq!(*seen.borrow(), vec!["one", "two"]);
    }

    #[test]
    fn test_segment_flags_are_confined() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut actions = ActionRegistry::new();
        let log = Rc::clone(&seen);
        actions
            .define(
                Action::new("tagged", 0, move |flags, _| {
                    log.borrow_mut().push(flags.get::<String>("tag").unwrap());
                    0
                })
                .chainable(),
            )
            .unwrap();
        actions
            .define_flag("tagged", Flag::string("tag", "foo"))
            .unwrap();
        let mut globals = FlagRegistry::new(Scope::Global);

        let mut first = segment("tagged", &[]);
        first
            .flags
            .insert("tag".to_string(), FlagValue::String("spam".into()));
        let plan = vec![first, segment("tagged", &[])];
        dispatch(&plan, &mut actions, &mut globals);

        assert_eq!(*seen.borrow(), vec!["spam", "foo"]);
    }

    #[test]
    fn test_failures_do_not_stop_the_chain() {
        let mut actions = ActionRegistry::new();
        actions
            .define(Action::new("fail", 0, |_, _| 3).chainable())
            .unwrap();
        actions
            .define(Action::new("pass", 0, |_, _| 0).chainable())
            .unwrap();
        let mut globals = FlagRegistry::new(Scope::Global);

        let plan = vec![segment("fail", &[]), segment("pass", &[])];
        assert_eq!(dispatch(&plan, &mut actions, &mut globals), vec![3, 0]);
    }

    #[test]
    fn test_undefined_action_keeps_statuses_aligned() {
        let mut actions = ActionRegistry::new();
        actions
            .define(Action::new("pass", 0, |_, _| 0).chainable())
            .unwrap();
        let mut globals = FlagRegistry::new(Scope::Global);

        let plan = vec![
            segment("pass", &[]),
            segment("gone", &[]),
            segment("pass", &[]),
        ];
        let statuses = dispatch(&plan, &mut actions, &mut globals);
        assert_eq!(statuses.len(), plan.len());
        assert_eq!(statuses, vec![0, UNDEFINED_ACTION_STATUS, 0]);
    }
}
