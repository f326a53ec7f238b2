//! Drawing helpers and fixed layout shared by both screens.

use embedded_graphics::{
    Drawable,
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_8X13},
    pixelcolor::Rgb888,
    prelude::{DrawTarget, Point, Primitive, Size},
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::{battery::ChargeState, framebuffer::{HEIGHT, WIDTH}};

pub const CENTER_X: i32 = WIDTH as i32 / 2;

const SENSOR_PADDING: i32 = 25;
const SENSOR_BUTTONS_TOP: i32 = 195;
const SENSOR_BUTTON_HEIGHT: u32 = 100;
const SENSOR_BUTTON_SPACING: i32 = 10;

/// Text centred horizontally and vertically on `center`.
pub fn label<D>(target: &mut D, text: &str, center: Point, font: &MonoFont<'_>, color: Rgb888)
where
    D: DrawTarget<Color = Rgb888>,
{
    let style = MonoTextStyle::new(font, color);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    Text::with_text_style(text, center, style, text_style)
        .draw(target)
        .ok();
}

pub fn button<D>(
    target: &mut D,
    area: Rectangle,
    text: &str,
    font: &MonoFont<'_>,
    background: Rgb888,
    foreground: Rgb888,
) where
    D: DrawTarget<Color = Rgb888>,
{
    area.into_styled(PrimitiveStyle::with_fill(background))
        .draw(target)
        .ok();
    label(target, text, area.center(), font, foreground);
}

/// Charge indicator in the bottom right corner.
pub fn charge<D>(target: &mut D, charge: Option<ChargeState>, color: Rgb888)
where
    D: DrawTarget<Color = Rgb888>,
{
    let Some(charge) = charge else {
        return;
    };
    let style = MonoTextStyle::new(&FONT_8X13, color);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Right)
        .baseline(Baseline::Bottom)
        .build();
    Text::with_text_style(
        &charge.format(),
        Point::new(WIDTH as i32 - 10, HEIGHT as i32 - 8),
        style,
        text_style,
    )
    .draw(target)
    .ok();
}

/// Area of the `index`th sensor screen button, top to bottom.
pub fn sensor_button_area(index: usize) -> Rectangle {
    let pitch = SENSOR_BUTTON_HEIGHT as i32 + SENSOR_BUTTON_SPACING;
    Rectangle::new(
        Point::new(SENSOR_PADDING, SENSOR_BUTTONS_TOP + index as i32 * pitch),
        Size::new(WIDTH as u32 - 2 * SENSOR_PADDING as u32, SENSOR_BUTTON_HEIGHT),
    )
}
