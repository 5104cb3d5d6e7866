//! Routing matrix: the closed set of patch cables between modules.
//!
//! Routes are named, enum-indexed connections. Signal routes carry audio
//! from one module's output into another module's input; modulation routes
//! feed an envelope's value into a parameter of another module. The table
//! itself only stores on/off and weight; [`RoutingTable::resolve`] turns it
//! into a [`SignalGraph`] the engine can walk without allocating.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use crate::{error::RoutingError, param::ROUTE_WEIGHT};

/*
Patch Layout
============

    ┌──────┐ osc1ToFilter1 ┌─────────┐ filter1ToDelay1 ┌────────┐
    │ OSC1 │ ────────────→ │ FILTER1 │ ──────────────→ │ DELAY1 │ ──┐
    └──────┘               └─────────┘                 └────────┘   │ delayToMixer
    ┌──────┐ osc2ToFilter2 ┌─────────┐ filter2ToDelay2 ┌────────┐   ├──────────→ MIXER
    │ OSC2 │ ────────────→ │ FILTER2 │ ──────────────→ │ DELAY2 │ ──┘
    └──────┘               └─────────┘                 └────────┘
        ↑ env1ToOsc2            ↑ env1ToFilter1 (FILTER1)
        │                       │ env2ToFilter2 (FILTER2)
      ENV1                  ENV1 / ENV2

`delayToMixer` is a single switch for both delay outputs.

A module is ACTIVE when its output reaches the mixer through enabled signal
routes. Disabling `filter1ToDelay1` silences OSC1 and FILTER1 as well, and
the engine skips evaluating them entirely until the route comes back.

Evaluation order comes from Kahn's algorithm over the active modules, so
every module runs after everything that feeds it.
*/

/// Whether a route carries audio or a control value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Signal,
    Modulation,
}

/// Signal modules in the engine's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleId {
    Osc1,
    Osc2,
    Filter1,
    Filter2,
    Delay1,
    Delay2,
    Mixer,
}

impl ModuleId {
    pub const COUNT: usize = 7;

    pub const ALL: [ModuleId; Self::COUNT] = [
        ModuleId::Osc1,
        ModuleId::Osc2,
        ModuleId::Filter1,
        ModuleId::Filter2,
        ModuleId::Delay1,
        ModuleId::Delay2,
        ModuleId::Mixer,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Modulation sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeId {
    Env1,
    Env2,
}

impl EnvelopeId {
    pub const ALL: [EnvelopeId; 2] = [EnvelopeId::Env1, EnvelopeId::Env2];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Parameter inputs a modulation route can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModTarget {
    Filter1Cutoff,
    Filter2Cutoff,
    Osc2Amplitude,
}

impl ModTarget {
    pub const COUNT: usize = 3;

    pub const ALL: [ModTarget; Self::COUNT] = [
        ModTarget::Filter1Cutoff,
        ModTarget::Filter2Cutoff,
        ModTarget::Osc2Amplitude,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Route {
    Osc1ToFilter1,
    Osc2ToFilter2,
    Filter1ToDelay1,
    Filter2ToDelay2,
    Env1ToFilter1,
    Env1ToOsc2,
    Env2ToFilter2,
    DelayToMixer,
}

impl Route {
    pub const COUNT: usize = 8;

    pub const ALL: [Route; Self::COUNT] = [
        Route::Osc1ToFilter1,
        Route::Osc2ToFilter2,
        Route::Filter1ToDelay1,
        Route::Filter2ToDelay2,
        Route::Env1ToFilter1,
        Route::Env1ToOsc2,
        Route::Env2ToFilter2,
        Route::DelayToMixer,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Route::Osc1ToFilter1 => "osc1ToFilter1",
            Route::Osc2ToFilter2 => "osc2ToFilter2",
            Route::Filter1ToDelay1 => "filter1ToDelay1",
            Route::Filter2ToDelay2 => "filter2ToDelay2",
            Route::Env1ToFilter1 => "env1ToFilter1",
            Route::Env1ToOsc2 => "env1ToOsc2",
            Route::Env2ToFilter2 => "env2ToFilter2",
            Route::DelayToMixer => "delayToMixer",
        }
    }

    pub fn kind(self) -> RouteKind {
        match self {
            Route::Env1ToFilter1 | Route::Env1ToOsc2 | Route::Env2ToFilter2 => {
                RouteKind::Modulation
            }
            _ => RouteKind::Signal,
        }
    }

    /// Factory patch: the straight oscillator → filter → delay → mixer chains.
    pub fn enabled_by_default(self) -> bool {
        self.kind() == RouteKind::Signal
    }

    /// Connections this route makes when enabled. Empty for modulation routes.
    pub fn signal_edges(self) -> &'static [(ModuleId, ModuleId)] {
        use ModuleId::*;
        match self {
            Route::Osc1ToFilter1 => &[(Osc1, Filter1)],
            Route::Osc2ToFilter2 => &[(Osc2, Filter2)],
            Route::Filter1ToDelay1 => &[(Filter1, Delay1)],
            Route::Filter2ToDelay2 => &[(Filter2, Delay2)],
            Route::DelayToMixer => &[(Delay1, Mixer), (Delay2, Mixer)],
            Route::Env1ToFilter1 | Route::Env1ToOsc2 | Route::Env2ToFilter2 => &[],
        }
    }

    /// Source and target for modulation routes.
    pub fn modulation(self) -> Option<(EnvelopeId, ModTarget)> {
        match self {
            Route::Env1ToFilter1 => Some((EnvelopeId::Env1, ModTarget::Filter1Cutoff)),
            Route::Env1ToOsc2 => Some((EnvelopeId::Env1, ModTarget::Osc2Amplitude)),
            Route::Env2ToFilter2 => Some((EnvelopeId::Env2, ModTarget::Filter2Cutoff)),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Route {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.name() == s)
            .ok_or_else(|| RoutingError::UnknownRoute(s.to_owned()))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteState {
    pub enabled: bool,
    /// Scale applied to a modulation route's source value. Ignored by signal routes.
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f32,
}

#[cfg(feature = "serde")]
fn default_weight() -> f32 {
    ROUTE_WEIGHT.default
}

impl RouteState {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            weight: ROUTE_WEIGHT.default,
        }
    }
}

/// On/off state and weight for every route.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        into = "BTreeMap<String, RouteState>",
        from = "BTreeMap<String, SavedRoute>"
    )
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingTable {
    states: [RouteState; Route::COUNT],
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            states: Route::ALL.map(|route| RouteState::new(route.enabled_by_default())),
        }
    }
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, route: Route) -> RouteState {
        self.states[route.index()]
    }

    pub fn is_enabled(&self, route: Route) -> bool {
        self.states[route.index()].enabled
    }

    pub fn weight(&self, route: Route) -> f32 {
        self.states[route.index()].weight
    }

    pub fn set_enabled(&mut self, route: Route, enabled: bool) {
        self.states[route.index()].enabled = enabled;
    }

    /// Flip a route and return its new state.
    pub fn toggle(&mut self, route: Route) -> bool {
        let state = &mut self.states[route.index()];
        state.enabled = !state.enabled;
        state.enabled
    }

    /// Clamped into the route weight range.
    pub fn set_weight(&mut self, route: Route, weight: f32) -> f32 {
        let weight = ROUTE_WEIGHT.clamp(weight);
        self.states[route.index()].weight = weight;
        weight
    }

    pub fn set_state(&mut self, route: Route, state: RouteState) {
        self.set_enabled(route, state.enabled);
        self.set_weight(route, state.weight);
    }

    pub fn toggle_route(&mut self, name: &str) -> Result<bool, RoutingError> {
        let route = name.parse::<Route>()?;
        Ok(self.toggle(route))
    }

    pub fn set_route(&mut self, name: &str, enabled: bool) -> Result<(), RoutingError> {
        let route = name.parse::<Route>()?;
        self.set_enabled(route, enabled);
        Ok(())
    }

    pub fn get_route(&self, name: &str) -> Result<bool, RoutingError> {
        let route = name.parse::<Route>()?;
        Ok(self.is_enabled(route))
    }

    pub fn set_route_weight(&mut self, name: &str, weight: f32) -> Result<f32, RoutingError> {
        let route = name.parse::<Route>()?;
        Ok(self.set_weight(route, weight))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Route, RouteState)> + '_ {
        Route::ALL.into_iter().map(|route| (route, self.state(route)))
    }

    /// Enabled modulation routes with their source, target and weight.
    pub fn modulations(&self) -> impl Iterator<Item = (EnvelopeId, ModTarget, f32)> + '_ {
        self.iter().filter_map(|(route, state)| {
            let (source, target) = route.modulation()?;
            state.enabled.then_some((source, target, state.weight))
        })
    }

    /// Turn the enabled signal routes into an evaluation plan.
    pub fn resolve(&self) -> SignalGraph {
        let mut destination = [None; ModuleId::COUNT];
        for (route, state) in self.iter() {
            if !state.enabled {
                continue;
            }
            for &(from, to) in route.signal_edges() {
                destination[from.index()] = Some(to);
            }
        }

        let mut active = [false; ModuleId::COUNT];
        for module in ModuleId::ALL {
            let mut current = module;
            // Chains are shorter than the module count; the bound guards against cycles
            for _ in 0..ModuleId::COUNT {
                if current == ModuleId::Mixer {
                    active[module.index()] = true;
                    break;
                }
                match destination[current.index()] {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }

        // Kahn's algorithm over the active modules
        let mut in_degree = [0usize; ModuleId::COUNT];
        for module in ModuleId::ALL {
            if !active[module.index()] {
                continue;
            }
            if let Some(to) = destination[module.index()] {
                in_degree[to.index()] += 1;
            }
        }

        let mut ready = [ModuleId::Mixer; ModuleId::COUNT];
        let (mut head, mut tail) = (0, 0);
        for module in ModuleId::ALL {
            if active[module.index()] && in_degree[module.index()] == 0 {
                ready[tail] = module;
                tail += 1;
            }
        }

        let mut order = [ModuleId::Mixer; ModuleId::COUNT];
        let mut len = 0;
        while head < tail {
            let module = ready[head];
            head += 1;
            if module != ModuleId::Mixer {
                order[len] = module;
                len += 1;
            }
            if let Some(to) = destination[module.index()] {
                in_degree[to.index()] -= 1;
                if in_degree[to.index()] == 0 {
                    ready[tail] = to;
                    tail += 1;
                }
            }
        }

        SignalGraph {
            destination,
            active,
            order,
            len,
        }
    }
}

#[cfg(feature = "serde")]
impl From<RoutingTable> for BTreeMap<String, RouteState> {
    fn from(table: RoutingTable) -> Self {
        table
            .iter()
            .map(|(route, state)| (route.name().to_owned(), state))
            .collect()
    }
}

/// A route as written in a preset file. Missing fields fall back to the
/// route's factory state.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SavedRoute {
    enabled: Option<bool>,
    weight: Option<f32>,
}

#[cfg(feature = "serde")]
impl SavedRoute {
    fn resolve(self, route: Route) -> RouteState {
        RouteState {
            enabled: self.enabled.unwrap_or(route.enabled_by_default()),
            weight: self.weight.unwrap_or(ROUTE_WEIGHT.default),
        }
    }
}

#[cfg(feature = "serde")]
impl From<BTreeMap<String, SavedRoute>> for RoutingTable {
    /// Missing routes keep their defaults. Unknown names are skipped.
    fn from(map: BTreeMap<String, SavedRoute>) -> Self {
        let mut table = RoutingTable::default();
        for (name, saved) in map {
            match name.parse::<Route>() {
                Ok(route) => table.set_state(route, saved.resolve(route)),
                Err(err) => log::warn!(target: "kluster::routing", "ignoring {err} in saved routing"),
            }
        }
        table
    }
}

/// Evaluation plan derived from a [`RoutingTable`].
///
/// `order` lists every active module except the mixer, each after all of
/// its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalGraph {
    destination: [Option<ModuleId>; ModuleId::COUNT],
    active: [bool; ModuleId::COUNT],
    order: [ModuleId; ModuleId::COUNT],
    len: usize,
}

impl Default for SignalGraph {
    fn default() -> Self {
        RoutingTable::default().resolve()
    }
}

impl SignalGraph {
    pub fn order(&self) -> &[ModuleId] {
        &self.order[..self.len]
    }

    pub fn destination(&self, module: ModuleId) -> Option<ModuleId> {
        self.destination[module.index()]
    }

    pub fn is_active(&self, module: ModuleId) -> bool {
        self.active[module.index()]
    }
}
