//! Bundled example scripts.
//!
//! These are complete, runnable sources for the script engine: each defines a
//! `draw` entry point returning a shape tree. Hosts surface them as starter
//! content; the precomputed table keys off them so the first paint of a
//! bundled example never waits on the engine.

/// Five rectangles in a row, hue-stepped fills, jittered vertical placement.
pub const COLORED_RECTANGLES: &str = r#"
import tracery

def draw():

    group = tracery.Group(0, 0, 100, 100, [])
    for n in range(0, 5):
        r = tracery.Rect(20, tracery.UniformFloat(10, 20), 18, 18)
        r.x = (n * 20)
        r.fill = f"hsl({n * 30}, 50%, 50%)"
        group.items.append(r)

    return group
"#;

/// Twenty translucent squares scattered in a quarter-size group, each holding
/// a randomly-hued circle.
pub const CIRCLES_IN_SQUARES: &str = r#"
from tracery import *

def rect_with_circle():

    rect = Rect(0, 0, 100, 100, items=[])
    rect.stroke = Color.hsla(200, 50, 50, 0.2)
    rect.fill = Color.hsla(200, 50, 50, 0.5)

    circle = Circle(50, 50, 45)
    hue = 100 + UniformFloat(-50, 50)
    circle.fill = Color.hsla(hue, 50, 50, 0.4)

    rect.add(circle)
    return rect


def draw():

    group = Group(0, 0, 50, 50, [])

    for n in range(0, 20):
        rect = rect_with_circle()

        rect.x = UniformFloat(0, 80)
        rect.y = UniformFloat(0, 80)
        rect.width = 20
        rect.height = 20

        group.add(rect)

    return group
"#;

/// All bundled scripts with their display names, in menu order.
pub const ALL: &[(&str, &str)] = &[
    ("colored rectangles", COLORED_RECTANGLES),
    ("circles in squares", CIRCLES_IN_SQUARES),
];
