//! Property tests: random mutation sequences never leave an invalid tree, and
//! a rejected mutation never leaves a trace.
//!
//! `PROPTEST_CASES` overrides the default case count.

use proptest::prelude::*;
use slash_schema_core::{
    ChannelType, ChoiceId, ChoiceValue, CommandId, IntoEnumIterator, OptionId, OptionType,
    SchemaError, SchemaTree, validate_tree,
};

const OPTION_COUNT: usize = 6;
const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];
const CHOICE_NAMES: [&str; 4] = ["Red", "Blue", "One", "Two"];

/// Includes types that can't carry choices.
const CHOICE_TYPES: [OptionType; 5] = [
    OptionType::String,
    OptionType::Integer,
    OptionType::Number,
    OptionType::Boolean,
    OptionType::Unknown,
];

const SETTABLE_TYPES: [OptionType; 11] = [
    OptionType::Subcommand,
    OptionType::SubcommandGroup,
    OptionType::String,
    OptionType::Integer,
    OptionType::Number,
    OptionType::Boolean,
    OptionType::User,
    OptionType::Channel,
    OptionType::Role,
    OptionType::Mentionable,
    OptionType::Attachment,
];

#[derive(Debug, Clone)]
enum Op {
    SetCommandOptions(Vec<usize>),
    SetChildOptions(usize, Vec<usize>),
    SetType(usize, OptionType),
    SetRequired(usize, bool),
    Rename(usize, usize),
    SetChoices(usize, Vec<usize>),
    SetAutocompletable(usize, bool),
    SetIntegerBounds(usize, Option<i64>, Option<i64>),
    SetStringLength(usize, Option<u32>, Option<u32>),
    SetNumberBounds(usize, Option<f64>, Option<f64>),
    SetChannelTypes(usize, Vec<ChannelType>),
    SetChoiceType(usize, OptionType),
    RenameChoice(usize, usize),
    SetChoiceValue(usize, ChoiceValue),
}

struct Fixture {
    tree: SchemaTree,
    command: CommandId,
    options: Vec<OptionId>,
    choices: Vec<ChoiceId>,
}

impl Fixture {
    fn new() -> Self {
        let mut tree = SchemaTree::new();
        let command = tree.create_command("root", "Root command").unwrap();
        let options = (0..OPTION_COUNT)
            .map(|i| {
                tree.create_option(format!("opt{i}"), "An option", OptionType::String).unwrap()
            })
            .collect();
        let choices = vec![
            tree.create_choice(OptionType::String, "Red", "red").unwrap(),
            tree.create_choice(OptionType::String, "Blue", "blue").unwrap(),
            tree.create_choice(OptionType::Integer, "One", 1).unwrap(),
            tree.create_choice(OptionType::Integer, "Two", 2).unwrap(),
        ];
        Self { tree, command, options, choices }
    }

    fn apply(&mut self, op: &Op) -> Result<(), SchemaError> {
        let options =
            |indices: &[usize]| indices.iter().map(|&i| self.options[i]).collect::<Vec<_>>();
        match op {
            Op::SetCommandOptions(indices) => {
                let ids = options(indices);
                self.tree.command_mut(self.command)?.set_options(ids)?;
            }
            Op::SetChildOptions(owner, indices) => {
                let ids = options(indices);
                self.tree.option_mut(self.options[*owner])?.set_options(ids)?;
            }
            Op::SetType(target, option_type) => {
                self.tree.option_mut(self.options[*target])?.set_type(*option_type)?;
            }
            Op::SetRequired(target, required) => {
                self.tree.option_mut(self.options[*target])?.set_required(*required)?;
            }
            Op::Rename(target, name) => {
                self.tree.option_mut(self.options[*target])?.set_name(NAMES[*name])?;
            }
            Op::SetChoices(target, indices) => {
                let ids = indices.iter().map(|&i| self.choices[i]).collect();
                self.tree.option_mut(self.options[*target])?.set_choices(ids)?;
            }
            Op::SetAutocompletable(target, enabled) => {
                self.tree.option_mut(self.options[*target])?.set_autocompletable(*enabled)?;
            }
            Op::SetIntegerBounds(target, min, max) => {
                self.tree.option_mut(self.options[*target])?.set_integer_bounds(*min, *max)?;
            }
            Op::SetStringLength(target, min, max) => {
                self.tree
                    .option_mut(self.options[*target])?
                    .set_string_length_bounds(*min, *max)?;
            }
            Op::SetNumberBounds(target, min, max) => {
                self.tree.option_mut(self.options[*target])?.set_number_bounds(*min, *max)?;
            }
            Op::SetChannelTypes(target, channel_types) => {
                self.tree
                    .option_mut(self.options[*target])?
                    .set_channel_type_bounds(channel_types.iter().copied())?;
            }
            Op::SetChoiceType(target, choice_type) => {
                self.tree.choice_mut(self.choices[*target])?.set_type(*choice_type)?;
            }
            Op::RenameChoice(target, name) => {
                self.tree.choice_mut(self.choices[*target])?.set_name(CHOICE_NAMES[*name])?;
            }
            Op::SetChoiceValue(target, value) => {
                self.tree.choice_mut(self.choices[*target])?.set_value(value.clone())?;
            }
        }
        Ok(())
    }
}

fn option_index() -> impl Strategy<Value = usize> {
    0..OPTION_COUNT
}

fn choice_index() -> impl Strategy<Value = usize> {
    0..4usize
}

fn choice_value() -> impl Strategy<Value = ChoiceValue> {
    prop_oneof![
        prop::sample::select(vec!["red", "blue", "", "green"])
            .prop_map(|text| ChoiceValue::Text(text.to_string())),
        (-3i64..3).prop_map(ChoiceValue::Integer),
        (-3.0f64..3.0).prop_map(ChoiceValue::Number),
    ]
}

fn channel_types() -> impl Strategy<Value = Vec<ChannelType>> {
    prop::collection::vec(prop::sample::select(ChannelType::iter().collect::<Vec<_>>()), 0..3)
}

/// Attachment, type, ordering and naming of options.
fn structure_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(option_index(), 0..4).prop_map(Op::SetCommandOptions),
        (option_index(), prop::collection::vec(option_index(), 0..3))
            .prop_map(|(owner, children)| Op::SetChildOptions(owner, children)),
        (option_index(), prop::sample::select(SETTABLE_TYPES.to_vec()))
            .prop_map(|(target, option_type)| Op::SetType(target, option_type)),
        (option_index(), any::<bool>())
            .prop_map(|(target, required)| Op::SetRequired(target, required)),
        (option_index(), 0..NAMES.len()).prop_map(|(target, name)| Op::Rename(target, name)),
    ]
}

/// Choices, autocomplete and type-gated bounds of options.
fn field_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (option_index(), prop::collection::vec(choice_index(), 0..3))
            .prop_map(|(target, choices)| Op::SetChoices(target, choices)),
        (option_index(), any::<bool>())
            .prop_map(|(target, enabled)| Op::SetAutocompletable(target, enabled)),
        (option_index(), prop::option::of(-10i64..10), prop::option::of(-10i64..10))
            .prop_map(|(target, min, max)| Op::SetIntegerBounds(target, min, max)),
        (option_index(), prop::option::of(0u32..10), prop::option::of(0u32..10))
            .prop_map(|(target, min, max)| Op::SetStringLength(target, min, max)),
        (option_index(), prop::option::of(-5.0f64..5.0), prop::option::of(-5.0f64..5.0))
            .prop_map(|(target, min, max)| Op::SetNumberBounds(target, min, max)),
        (option_index(), channel_types())
            .prop_map(|(target, channel_types)| Op::SetChannelTypes(target, channel_types)),
    ]
}

fn choice_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (choice_index(), prop::sample::select(CHOICE_TYPES.to_vec()))
            .prop_map(|(target, choice_type)| Op::SetChoiceType(target, choice_type)),
        (choice_index(), 0..CHOICE_NAMES.len())
            .prop_map(|(target, name)| Op::RenameChoice(target, name)),
        (choice_index(), choice_value())
            .prop_map(|(target, value)| Op::SetChoiceValue(target, value)),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![5 => structure_op(), 6 => field_op(), 3 => choice_op()]
}

fn config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(128);
    ProptestConfig::with_cases(cases)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn prop_accepted_mutations_keep_tree_valid(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut fixture = Fixture::new();
        for op in &ops {
            let before = fixture.tree.clone();
            match fixture.apply(op) {
                Ok(()) => {
                    let issues = validate_tree(&fixture.tree);
                    prop_assert!(issues.is_empty(), "{op:?} produced {issues:?}");
                }
                Err(_) => prop_assert_eq!(
                    &fixture.tree,
                    &before,
                    "{:?} was rejected but changed the tree",
                    op
                ),
            }
        }
    }

    #[test]
    fn prop_attached_options_have_one_parent(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut fixture = Fixture::new();
        for op in &ops {
            let _ = fixture.apply(op);
        }

        for &id in &fixture.options {
            let option = fixture.tree.option(id).unwrap();
            let holders = fixture
                .tree
                .commands()
                .filter(|(_, command)| command.options().contains(&id))
                .count()
                + fixture
                    .tree
                    .options()
                    .filter(|(_, parent)| parent.options().contains(&id))
                    .count();
            prop_assert_eq!(holders, usize::from(option.parent().is_some()));
        }
    }
}
