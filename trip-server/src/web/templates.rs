//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{ClockRange, Region, RouteOption, Segment, TransitLine};
use crate::schedule::{TimeSlot, TimeSlots, calculate_time_slot};
use crate::selection::{Field, SelectionState, View};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Map page with the search panel.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub region_name: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub mock: bool,
    pub auto_search: bool,
}

impl IndexTemplate {
    pub fn new(region: &Region, mock: bool, auto_search: bool) -> Self {
        Self {
            region_name: region.name.clone(),
            center_lat: region.center.lat,
            center_lng: region.center.lng,
            north: region.bounds.north,
            south: region.bounds.south,
            east: region.bounds.east,
            west: region.bounds.west,
            mock,
            auto_search,
        }
    }
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Search panel: inputs plus the route list or the open route.
#[derive(Template)]
#[template(path = "session.html")]
pub struct SessionTemplate {
    pub session_id: u64,
    pub start_text: String,
    pub end_text: String,
    pub locations_selected: bool,
    pub routes: Vec<RouteCardView>,
    pub detail: Option<RouteDetailView>,
}

impl SessionTemplate {
    pub fn from_state(session_id: u64, state: &SelectionState) -> Self {
        let routes = match state.view() {
            View::ResultsShown => state
                .results()
                .map(|set| {
                    set.options()
                        .iter()
                        .enumerate()
                        .map(|(i, o)| RouteCardView::new(i, o, i == state.selected_index()))
                        .collect()
                })
                .unwrap_or_default(),
            View::Searching | View::DetailShown => Vec::new(),
        };

        Self {
            session_id,
            start_text: state.endpoint(Field::Start).text.clone(),
            end_text: state.endpoint(Field::End).text.clone(),
            locations_selected: state.locations_selected(),
            routes,
            detail: state.selected_route().map(RouteDetailView::new),
        }
    }
}

/// Departure-time picker and stop list for a scheduled route.
#[derive(Template)]
#[template(path = "schedule.html")]
pub struct ScheduleTemplate {
    pub route_id: String,
    pub departure_stop: String,
    pub duration_minutes: u32,
    pub pills: Vec<PillView>,
    pub departure: String,
    pub arrival: String,
    pub stops: Vec<StopView>,
}

impl ScheduleTemplate {
    pub fn new(
        route_id: &str,
        duration_minutes: u32,
        slots: &TimeSlots,
        selected: &TimeSlot,
    ) -> Self {
        let pills = slots
            .iter()
            .map(|s| PillView {
                label: s.label(),
                selected: s.departure() == selected.departure(),
            })
            .collect();

        Self {
            route_id: route_id.to_string(),
            departure_stop: selected
                .arrivals()
                .first()
                .map(|a| a.stop.clone())
                .unwrap_or_default(),
            duration_minutes,
            pills,
            departure: selected.label(),
            arrival: selected
                .final_arrival()
                .map(|t| t.to_string())
                .unwrap_or_default(),
            stops: StopView::from_slot(selected),
        }
    }
}

/// The transit line catalog.
#[derive(Template)]
#[template(path = "lines.html")]
pub struct LinesTemplate {
    pub lines: Vec<LineView>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// A route option in the result list.
#[derive(Debug, Clone)]
pub struct RouteCardView {
    pub index: usize,
    pub id: String,
    pub departure: String,
    pub arrival: String,
    pub duration_minutes: u32,
    pub transfers: u32,
    pub lines: String,
    pub selected: bool,
}

impl RouteCardView {
    pub fn new(index: usize, option: &RouteOption, selected: bool) -> Self {
        Self {
            index,
            id: option.id().to_string(),
            departure: option.departure().to_string(),
            arrival: option.arrival().to_string(),
            duration_minutes: option.total_duration_minutes(),
            transfers: option.transfer_count(),
            lines: option.sub_route_names().collect::<Vec<_>>().join(" → "),
            selected,
        }
    }

    pub fn transfer_text(&self) -> String {
        match self.transfers {
            0 => "Direct".to_string(),
            1 => "1 transfer".to_string(),
            n => format!("{n} transfers"),
        }
    }
}

/// Stop-by-stop detail of one route option.
#[derive(Debug, Clone)]
pub struct RouteDetailView {
    pub id: String,
    pub duration_minutes: u32,
    pub segments: Vec<SegmentView>,
}

impl RouteDetailView {
    pub fn new(option: &RouteOption) -> Self {
        Self {
            id: option.id().to_string(),
            duration_minutes: option.total_duration_minutes(),
            segments: option.segments().iter().map(SegmentView::new).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SegmentView {
    pub line: String,
    pub departure: String,
    pub arrival: String,
    pub schedule: String,
    pub stops: Vec<StopView>,
}

impl SegmentView {
    pub fn new(segment: &Segment) -> Self {
        let timeline = calculate_time_slot(segment.departure(), segment.stops().as_slice());
        Self {
            line: segment.sub_route_name().to_string(),
            departure: segment.departure().to_string(),
            arrival: segment.arrival().to_string(),
            schedule: segment.schedule_description().to_string(),
            stops: StopView::from_slot(&timeline),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StopView {
    pub name: String,
    pub time: String,
    pub is_first: bool,
}

impl StopView {
    fn from_slot(slot: &TimeSlot) -> Vec<Self> {
        slot.arrivals()
            .iter()
            .enumerate()
            .map(|(i, a)| StopView {
                name: a.stop.clone(),
                time: a.time.to_string(),
                is_first: i == 0,
            })
            .collect()
    }
}

/// A departure-time pill.
#[derive(Debug, Clone)]
pub struct PillView {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct LineView {
    pub name: String,
    pub weekday: String,
    pub saturday: String,
    pub sunday: String,
    pub description: String,
    pub operating: bool,
}

impl LineView {
    pub fn new(line: &TransitLine, operating: bool) -> Self {
        let hours = |r: Option<ClockRange>| {
            r.map(|r| r.to_string())
                .unwrap_or_else(|| "No service".to_string())
        };
        Self {
            name: line.name.clone(),
            weekday: line.hours.weekday.to_string(),
            saturday: hours(line.hours.saturday),
            sunday: hours(line.hours.sunday),
            description: line.description.clone(),
            operating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::{ClockTime, Coordinate, Location, ResultSet, Stop, StopSequence};
    use crate::schedule::generate_time_slots;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    fn two_leg_option() -> RouteOption {
        let first = Segment::new(
            "Downtown Link",
            t("2:00 PM"),
            StopSequence::new(vec![
                Stop::new("Central Terminal", 0),
                Stop::new("Las Olas Blvd", 15),
            ])
            .unwrap(),
            "7:30AM to 6:00PM",
        );
        let second = Segment::new(
            "Beach Link",
            t("2:20 PM"),
            StopSequence::new(vec![
                Stop::new("Las Olas Blvd", 0),
                Stop::new("Fort Lauderdale Beach", 25),
            ])
            .unwrap(),
            "9:30AM to 6:33PM",
        );
        RouteOption::new("2", vec![first, second], 45, t("2:00 PM"), t("2:45 PM"), 1).unwrap()
    }

    #[test]
    fn route_card_text() {
        let card = RouteCardView::new(1, &two_leg_option(), true);
        assert_eq!(card.lines, "Downtown Link → Beach Link");
        assert_eq!(card.transfer_text(), "1 transfer");
        assert_eq!(card.duration_minutes, 45);
    }

    #[test]
    fn segment_timeline_uses_stop_offsets() {
        let detail = RouteDetailView::new(&two_leg_option());
        let second = &detail.segments[1];
        assert_eq!(second.line, "Beach Link");
        assert_eq!(second.arrival, "2:45 PM");
        assert_eq!(second.stops[1].name, "Fort Lauderdale Beach");
        assert_eq!(second.stops[1].time, "2:45 PM");
        assert!(second.stops[0].is_first);
    }

    #[test]
    fn session_fragment_renders_detail() {
        let mut state = SelectionState::new();
        let place = |name: &str, lng: f64| Location::new(Coordinate::new(26.12, lng).unwrap(), name);
        state.select_place(Field::Start, place("Central Terminal", -80.14));
        state.select_place(Field::End, place("Fort Lauderdale Beach", -80.10));
        state
            .find_routes(Arc::new(ResultSet::collect(vec![Ok(two_leg_option())])))
            .unwrap();

        let list = SessionTemplate::from_state(3, &state).render().unwrap();
        assert!(list.contains("Downtown Link → Beach Link"));
        assert!(!list.contains("Back to routes"));

        state.select_route(0).unwrap();
        let html = SessionTemplate::from_state(3, &state).render().unwrap();
        assert!(html.contains("Back to routes"));
        assert!(html.contains("Las Olas Blvd"));
        assert!(html.contains("45 min"));
    }

    #[test]
    fn schedule_fragment_marks_selected_pill() {
        let stops = vec![
            Stop::new("Downtown Station", 0),
            Stop::new("Fort Lauderdale Beach", 30),
        ];
        let slots = generate_time_slots(t("1:55 PM"), 3, 20, &stops).unwrap();
        let selected = slots.get("2:15 PM").unwrap();
        let template = ScheduleTemplate::new("downtown-beach", 30, &slots, selected);

        assert_eq!(template.pills.len(), 3);
        assert!(template.pills[1].selected);
        assert!(!template.pills[0].selected);
        assert_eq!(template.arrival, "2:45 PM");

        let html = template.render().unwrap();
        assert!(html.contains("2:15 PM - 2:45 PM"));
        assert!(html.contains("Departure from: Downtown Station"));
    }

    #[test]
    fn line_without_weekend_service() {
        let line = TransitLine {
            id: "downtown-link".into(),
            name: "Downtown Link".into(),
            hours: crate::domain::ServiceHours {
                weekday: ClockRange::parse("7:30AM to 6:00PM").unwrap(),
                saturday: None,
                sunday: None,
            },
            description: String::new(),
        };
        let view = LineView::new(&line, false);
        assert_eq!(view.saturday, "No service");
        assert_eq!(view.weekday, "7:30 AM to 6:00 PM");
    }
}
