//! Picks the monitor the popup is placed on.

use crate::config::MonitorSelector;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Edges count as inside, so a pointer on a border shared by two
    /// monitors belongs to the one enumerated first.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && i64::from(point.x) <= i64::from(self.x) + i64::from(self.width)
            && i64::from(point.y) <= i64::from(self.y) + i64::from(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub name: Option<String>,
    pub rect: Rect,
}

/// Anything that can enumerate monitors and report the pointer position.
pub trait MonitorSource {
    fn monitors(&self) -> Result<Vec<Monitor>, Error>;

    /// `None` when the pointer is on another screen.
    fn pointer(&self) -> Result<Option<Point>, Error>;
}

/// Queries `source` once and returns the rectangle of the selected monitor.
///
/// The pointer is only queried when no name is given.
pub fn locate<S: MonitorSource>(source: &S, selector: &MonitorSelector) -> Result<Rect, Error> {
    let monitors = source.monitors()?;
    log::debug!("found {} monitor(s): {:?}", monitors.len(), monitors);
    let pointer = match selector {
        MonitorSelector::Name(_) => None,
        MonitorSelector::Pointer => source.pointer()?,
    };
    let monitor = select(&monitors, selector, pointer)?;
    log::debug!("selected monitor {:?}", monitor);
    Ok(monitor.rect)
}

/// Pure selection step of [`locate`].
pub fn select<'a>(
    monitors: &'a [Monitor],
    selector: &MonitorSelector,
    pointer: Option<Point>,
) -> Result<&'a Monitor, Error> {
    let found = match selector {
        MonitorSelector::Name(name) => monitors
            .iter()
            .find(|m| m.name.as_deref() == Some(name.as_str())),
        MonitorSelector::Pointer => {
            pointer.and_then(|p| monitors.iter().find(|m| m.rect.contains(p)))
        }
    };
    found.ok_or(Error::NoMonitorMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeMonitors;

    fn monitor(name: &str, x: i32, y: i32, width: u32, height: u32) -> Monitor {
        Monitor {
            name: Some(name.to_owned()),
            rect: Rect {
                x,
                y,
                width,
                height,
            },
        }
    }

    fn dual_head() -> Vec<Monitor> {
        vec![
            monitor("eDP-1", 0, 0, 1920, 1080),
            monitor("HDMI-1", 1920, 0, 2560, 1440),
        ]
    }

    #[test]
    fn pointer_picks_containing_monitor() {
        let monitors = dual_head();
        let found = select(
            &monitors,
            &MonitorSelector::Pointer,
            Some(Point { x: 2000, y: 500 }),
        )
        .expect("no monitor");
        assert_eq!(found.name.as_deref(), Some("HDMI-1"));
    }

    #[test]
    fn shared_edge_goes_to_first_monitor() {
        let monitors = dual_head();
        let found = select(
            &monitors,
            &MonitorSelector::Pointer,
            Some(Point { x: 1920, y: 10 }),
        )
        .expect("no monitor");
        assert_eq!(found.name.as_deref(), Some("eDP-1"));
    }

    #[test]
    fn name_wins_over_pointer() {
        let source = FakeMonitors::new(dual_head(), Some(Point { x: 10, y: 10 }));
        let rect = locate(&source, &MonitorSelector::Name("HDMI-1".to_owned()))
            .expect("no monitor");
        assert_eq!(rect, dual_head()[1].rect);
        assert_eq!(source.pointer_queries(), 0);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let monitors = dual_head();
        let result = select(&monitors, &MonitorSelector::Name("DP-3".to_owned()), None);
        assert!(matches!(result, Err(Error::NoMonitorMatch)));
    }

    #[test]
    fn pointer_outside_all_monitors_is_an_error() {
        let source = FakeMonitors::new(dual_head(), Some(Point { x: -50, y: 2000 }));
        let result = locate(&source, &MonitorSelector::Pointer);
        assert!(matches!(result, Err(Error::NoMonitorMatch)));
        assert_eq!(source.pointer_queries(), 1);
    }

    #[test]
    fn pointer_on_other_screen_is_an_error() {
        let source = FakeMonitors::new(dual_head(), None);
        assert!(matches!(
            locate(&source, &MonitorSelector::Pointer),
            Err(Error::NoMonitorMatch)
        ));
    }

    #[test]
    fn no_monitors_is_an_error() {
        let result = select(&[], &MonitorSelector::Pointer, Some(Point::default()));
        assert!(matches!(result, Err(Error::NoMonitorMatch)));
    }
}
