//! Binding simulator
//!
//! Drives a [`SpinBinding`] against the in-memory engine with a script of
//! steps and records what the caller would observe. A controlled widget is
//! simulated with a well-behaved caller: every reported value is applied
//! with a re-render, the way a state hook would.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result};
use spinbind_binding::{Authority, BindingConfig, ChangeMeta, SpinBinding, SpinProps};
use spinbind_core::memory::{MemoryEngine, MemoryFactory, MemoryHost};
use spinbind_core::{DomainEvent, HostElement, Renderer};

// ============================================================================
// Steps
// ============================================================================

/// One scripted interaction
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Handle `increment()`
    Up,
    /// Handle `decrement()`
    Down,
    /// Handle `set_value(n)`
    Set(f64),
    /// User types text and commits it
    Input(String),
    /// Re-render as controlled with this value
    Value(f64),
    /// Re-render as uncontrolled
    Free,
    /// Hold the up button for n steps
    SpinUp(u32),
    /// Hold the down button for n steps
    SpinDown(u32),
    /// Re-render with another renderer
    Renderer(Renderer),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (s, None),
        };
        let arg = || value.with_context(|| format!("Step '{}' needs a value", name));
        let number = || -> Result<f64> {
            let raw = arg()?;
            raw.trim()
                .parse()
                .with_context(|| format!("Invalid number '{}' in step '{}'", raw, s))
        };
        let count = || -> Result<u32> {
            let raw = arg()?;
            raw.trim()
                .parse()
                .with_context(|| format!("Invalid count '{}' in step '{}'", raw, s))
        };

        let step = match name {
            "up" => Step::Up,
            "down" => Step::Down,
            "set" => Step::Set(number()?),
            "input" => Step::Input(arg()?.to_string()),
            "value" => Step::Value(number()?),
            "free" => Step::Free,
            "spin-up" => Step::SpinUp(count()?),
            "spin-down" => Step::SpinDown(count()?),
            "renderer" => Step::Renderer(arg()?.parse()?),
            other => anyhow::bail!(
                "Unknown step '{}'. Valid steps: up, down, set=N, input=TEXT, value=N, free, \
                 spin-up=N, spin-down=N, renderer=NAME",
                other
            ),
        };
        Ok(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Up => write!(f, "up"),
            Step::Down => write!(f, "down"),
            Step::Set(value) => write!(f, "set={}", value),
            Step::Input(text) => write!(f, "input={}", text),
            Step::Value(value) => write!(f, "value={}", value),
            Step::Free => write!(f, "free"),
            Step::SpinUp(ticks) => write!(f, "spin-up={}", ticks),
            Step::SpinDown(ticks) => write!(f, "spin-down={}", ticks),
            Step::Renderer(renderer) => write!(f, "renderer={}", renderer),
        }
    }
}

/// Parse a comma-separated step list
pub fn parse_steps<'a>(steps: impl IntoIterator<Item = &'a str>) -> Result<Vec<Step>> {
    steps
        .into_iter()
        .flat_map(|chunk| chunk.split(','))
        .filter(|step| !step.trim().is_empty())
        .map(str::parse)
        .collect()
}

// ============================================================================
// Simulation
// ============================================================================

/// Something the caller observed
#[derive(Clone, Debug, PartialEq)]
pub enum Observed {
    Change(f64, ChangeMeta),
    Domain(DomainEvent),
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Change(value, meta) => write!(f, "on_change({}, {})", value, meta),
            Observed::Domain(event) => write!(f, "{}", event),
        }
    }
}

/// State after one step
#[derive(Clone, Debug)]
pub struct Outcome {
    pub step: Step,
    pub observed: Vec<Observed>,
    pub raw: String,
    pub authority: Authority,
}

pub struct Simulation {
    binding: SpinBinding<MemoryFactory>,
    host: Rc<MemoryHost>,
    props: SpinProps,
    observed: Rc<RefCell<Vec<Observed>>>,
}

impl Simulation {
    /// Mount a binding for `props`
    pub fn start(props: SpinProps) -> Result<Self> {
        let observed = Rc::new(RefCell::new(Vec::new()));
        let config = recording_config(&props, &observed);
        let host = MemoryHost::new();
        let mut binding = SpinBinding::new(MemoryFactory::new(), config);
        binding
            .mount(host.clone())
            .context("Failed to mount binding")?;

        let mut simulation = Self {
            binding,
            host,
            props,
            observed,
        };
        simulation.apply_reported()?;
        Ok(simulation)
    }

    /// Raw host text
    pub fn raw(&self) -> String {
        self.host.raw_value()
    }

    pub fn authority(&self) -> Authority {
        self.binding.authority()
    }

    pub fn factory(&self) -> &MemoryFactory {
        self.binding.factory()
    }

    /// Everything observed so far and not yet returned by [`Simulation::apply`]
    pub fn drain(&self) -> Vec<Observed> {
        self.observed.borrow_mut().drain(..).collect()
    }

    /// Run one step, then let a controlled caller apply what it was told
    pub fn apply(&mut self, step: Step) -> Result<Outcome> {
        let handle = self.binding.handle();
        match &step {
            Step::Up => handle.increment(),
            Step::Down => handle.decrement(),
            Step::Set(value) => handle.set_value(*value),
            Step::Input(text) => {
                self.host.type_text(text);
            }
            Step::Value(value) => {
                self.props.value = Some(*value);
                self.render()?;
            }
            Step::Free => {
                self.props.value = None;
                self.render()?;
            }
            Step::SpinUp(ticks) => self.engine()?.spin_up(*ticks),
            Step::SpinDown(ticks) => self.engine()?.spin_down(*ticks),
            Step::Renderer(renderer) => {
                self.props.renderer = *renderer;
                self.render()?;
            }
        }

        let observed = self.apply_reported()?;
        Ok(Outcome {
            step,
            observed,
            raw: self.raw(),
            authority: self.authority(),
        })
    }

    fn engine(&self) -> Result<Rc<MemoryEngine>> {
        self.factory()
            .last_engine()
            .filter(|engine| !engine.is_destroyed())
            .context("No live engine")
    }

    fn render(&mut self) -> Result<()> {
        let config = recording_config(&self.props, &self.observed);
        self.binding.update(config).context("Failed to re-render")
    }

    /// Re-render a controlled caller with the last reported value
    fn apply_reported(&mut self) -> Result<Vec<Observed>> {
        let mut observed = Vec::new();
        loop {
            let batch = self.drain();
            let last = batch.iter().rev().find_map(|item| match item {
                Observed::Change(value, _) => Some(*value),
                Observed::Domain(_) => None,
            });
            observed.extend(batch);

            match (self.props.value, last) {
                (Some(current), Some(reported)) if current != reported => {
                    self.props.value = Some(reported);
                    self.render()?;
                }
                _ => return Ok(observed),
            }
        }
    }
}

fn recording_config(props: &SpinProps, observed: &Rc<RefCell<Vec<Observed>>>) -> BindingConfig {
    let sink = observed.clone();
    let mut config = BindingConfig::from_props(props.clone())
        .on_change(move |value, meta| sink.borrow_mut().push(Observed::Change(value, meta)));
    for event in DomainEvent::ALL {
        let sink = observed.clone();
        config = config.on(event, move || sink.borrow_mut().push(Observed::Domain(event)));
    }
    config
}
