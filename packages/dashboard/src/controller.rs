//! Interaction controller.
//!
//! [`transition`] maps `(state, event)` to the next state plus a
//! [`Recompute`] plan saying which parts of the page need work. A
//! [`Session`] applies plans, caching the choropleth, density sample and
//! ranking so that cheap interactions (view toggles, layer switches) never
//! touch the incident list.

use crime_dashboard_analytics_models::YearFilter;
use crime_dashboard_models::{
    ChoroplethPayload, DashboardEvent, DashboardState, HotspotPayload, MapPayload, RenderPayload,
};

use crate::context::DashboardContext;
use crate::presenter::{
    Ranking, assemble_map, compute_ranking, render_choropleth, render_drill_down, render_hotspots,
};

/// Errors for events the dashboard refuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    /// The requested year is outside the dataset.
    #[error("Year {year} is outside the available range {first}–{last}")]
    YearOutOfRange {
        /// Requested year.
        year: i32,
        /// First available year.
        first: i32,
        /// Last available year.
        last: i32,
    },
}

/// Work needed on the map after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapWork {
    /// Nothing changed.
    Keep,
    /// Same data, different visible layers.
    Relayer,
    /// Year changed; aggregate again.
    Recompute,
}

/// Work needed on the drill-down panel after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillDownWork {
    /// Nothing changed.
    Keep,
    /// Same ranking, different view mode.
    Reproject,
    /// Division or year changed; rank again.
    Recompute,
}

/// Which parts of the page an event invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recompute {
    /// Map work.
    pub map: MapWork,
    /// Drill-down work.
    pub drill_down: DrillDownWork,
}

impl Recompute {
    const NOTHING: Self = Self {
        map: MapWork::Keep,
        drill_down: DrillDownWork::Keep,
    };
}

/// Outcome of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Next state.
    pub state: DashboardState,
    /// Work to do.
    pub plan: Recompute,
    /// Message for the user, if any.
    pub notice: Option<String>,
}

/// Computes the next state for `event`.
///
/// # Errors
///
/// Returns [`InteractionError::YearOutOfRange`] for a year outside the
/// dataset; the current state stays in effect.
pub fn transition(
    ctx: &DashboardContext,
    state: &DashboardState,
    event: &DashboardEvent,
) -> Result<Transition, InteractionError> {
    let mut next = state.clone();
    let mut notice = None;

    let plan = match event {
        DashboardEvent::SelectYear { year } => {
            if let YearFilter::Year(y) = *year
                && !ctx.accepts_year(*year)
            {
                return Err(InteractionError::YearOutOfRange {
                    year: y,
                    first: *ctx.years().start(),
                    last: *ctx.years().end(),
                });
            }

            next.year = *year;
            next.selected_division = state
                .selected_division
                .as_deref()
                .and_then(|d| ctx.resolve_division(d));

            if next == *state {
                Recompute::NOTHING
            } else {
                Recompute {
                    map: MapWork::Recompute,
                    drill_down: DrillDownWork::Recompute,
                }
            }
        }
        DashboardEvent::ClickDivision { division } => {
            let clicked = division.as_deref().filter(|d| !d.trim().is_empty());
            next.selected_division = clicked.and_then(|d| ctx.resolve_division(d));

            if let (Some(raw), None) = (clicked, &next.selected_division) {
                log::debug!("Click on unknown division '{raw}'; showing citywide ranking");
                notice = Some(format!(
                    "No data for division '{}'; showing the citywide ranking",
                    raw.trim()
                ));
            }

            selection_plan(state, &next)
        }
        DashboardEvent::ClearSelection => {
            next.selected_division = None;
            selection_plan(state, &next)
        }
        DashboardEvent::SetViewMode { mode } => {
            next.view_mode = *mode;
            Recompute {
                map: MapWork::Keep,
                drill_down: if next.view_mode == state.view_mode {
                    DrillDownWork::Keep
                } else {
                    DrillDownWork::Reproject
                },
            }
        }
        DashboardEvent::SetMapLayer { layer } => {
            next.map_layer = *layer;
            Recompute {
                map: if next.map_layer == state.map_layer {
                    MapWork::Keep
                } else {
                    MapWork::Relayer
                },
                drill_down: DrillDownWork::Keep,
            }
        }
    };

    Ok(Transition {
        state: next,
        plan,
        notice,
    })
}

fn selection_plan(previous: &DashboardState, next: &DashboardState) -> Recompute {
    Recompute {
        map: MapWork::Keep,
        drill_down: if next.selected_division == previous.selected_division {
            DrillDownWork::Keep
        } else {
            DrillDownWork::Recompute
        },
    }
}

/// One browser session's interaction state and cached renders.
#[derive(Debug, Clone)]
pub struct Session {
    state: DashboardState,
    choropleth: ChoroplethPayload,
    hotspots: Option<HotspotPayload>,
    ranking: Ranking,
}

impl Session {
    /// A session in the initial state: citywide, table view, all years,
    /// choropleth only.
    #[must_use]
    pub fn new(ctx: &DashboardContext) -> Self {
        let state = DashboardState::default();
        Self {
            choropleth: render_choropleth(ctx, state.year),
            hotspots: None,
            ranking: compute_ranking(ctx, None, state.year),
            state,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Cached ranking for the current selection.
    #[must_use]
    pub const fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Renders the whole page for the current state.
    pub fn render(&mut self, ctx: &DashboardContext) -> RenderPayload {
        RenderPayload {
            state: self.state.clone(),
            map: Some(self.map(ctx)),
            drill_down: Some(render_drill_down(ctx, &self.ranking, self.state.view_mode)),
            notice: None,
        }
    }

    /// Applies one event and renders whatever changed.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError`] if the event is refused; the session is
    /// left unchanged.
    pub fn apply(
        &mut self,
        ctx: &DashboardContext,
        event: &DashboardEvent,
    ) -> Result<RenderPayload, InteractionError> {
        let Transition {
            state,
            plan,
            notice,
        } = transition(ctx, &self.state, event)?;

        log::debug!("{event:?}: {plan:?}");
        self.state = state;

        let map = match plan.map {
            MapWork::Keep => None,
            MapWork::Relayer => Some(self.map(ctx)),
            MapWork::Recompute => {
                self.choropleth = render_choropleth(ctx, self.state.year);
                self.hotspots = None;
                Some(self.map(ctx))
            }
        };

        let drill_down = match plan.drill_down {
            DrillDownWork::Keep => None,
            DrillDownWork::Reproject => {
                Some(render_drill_down(ctx, &self.ranking, self.state.view_mode))
            }
            DrillDownWork::Recompute => {
                self.ranking = compute_ranking(
                    ctx,
                    self.state.selected_division.as_deref(),
                    self.state.year,
                );
                Some(render_drill_down(ctx, &self.ranking, self.state.view_mode))
            }
        };

        Ok(RenderPayload {
            state: self.state.clone(),
            map,
            drill_down,
            notice,
        })
    }

    /// Map payload for the current state, sampling the density layer on
    /// first use.
    fn map(&mut self, ctx: &DashboardContext) -> MapPayload {
        if self.state.map_layer.shows_density()
            && self
                .hotspots
                .as_ref()
                .is_none_or(|h| h.year != self.state.year)
        {
            self.hotspots = Some(render_hotspots(ctx, self.state.year));
        }

        assemble_map(
            ctx,
            self.state.map_layer,
            &self.choropleth,
            self.hotspots.as_ref(),
        )
    }
}
