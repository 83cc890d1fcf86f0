//! Zodiac overlay: today's sign drawn as a small constellation in the corner.

use chrono::{Datelike, NaiveDate};
use glam::Vec2;

/// Top-left corner of the pattern, in screen pixels.
pub const OVERLAY_ORIGIN: Vec2 = Vec2::new(80.0, 80.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZodiacSign {
    Capricorn,
    Aquarius,
    Pisces,
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
}

/// First (month, day) of each sign, in calendar order.
const STARTS: [((u32, u32), ZodiacSign); 12] = [
    ((1, 20), ZodiacSign::Aquarius),
    ((2, 19), ZodiacSign::Pisces),
    ((3, 21), ZodiacSign::Aries),
    ((4, 20), ZodiacSign::Taurus),
    ((5, 21), ZodiacSign::Gemini),
    ((6, 21), ZodiacSign::Cancer),
    ((7, 23), ZodiacSign::Leo),
    ((8, 23), ZodiacSign::Virgo),
    ((9, 23), ZodiacSign::Libra),
    ((10, 23), ZodiacSign::Scorpio),
    ((11, 22), ZodiacSign::Sagittarius),
    ((12, 22), ZodiacSign::Capricorn),
];

impl ZodiacSign {
    /// Sign whose date range contains `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let today = (date.month(), date.day());
        STARTS
            .iter()
            .rev()
            .find(|(start, _)| today >= *start)
            .map(|(_, sign)| *sign)
            .unwrap_or(ZodiacSign::Capricorn)
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
        }
    }

    /// Star positions in overlay pixels, joined in order by lines.
    pub fn pattern(self) -> &'static [(f32, f32)] {
        match self {
            ZodiacSign::Aries => &[(0.0, 20.0), (30.0, 0.0), (60.0, 10.0), (80.0, 30.0)],
            ZodiacSign::Taurus => &[(0.0, 0.0), (20.0, 20.0), (40.0, 10.0), (20.0, -20.0), (60.0, -30.0)],
            ZodiacSign::Gemini => &[(0.0, 0.0), (0.0, 60.0), (40.0, 60.0), (40.0, 0.0)],
            ZodiacSign::Cancer => &[(0.0, 0.0), (20.0, 20.0), (40.0, 0.0), (20.0, -20.0)],
            ZodiacSign::Leo => &[(0.0, 0.0), (20.0, -20.0), (40.0, -10.0), (50.0, 10.0), (40.0, 30.0), (10.0, 40.0)],
            ZodiacSign::Virgo => &[(0.0, 0.0), (20.0, 20.0), (40.0, 10.0), (60.0, 30.0), (50.0, 50.0)],
            ZodiacSign::Libra => &[(0.0, 20.0), (30.0, 20.0), (15.0, 0.0), (15.0, 40.0)],
            ZodiacSign::Scorpio => &[(0.0, 0.0), (10.0, 20.0), (20.0, 10.0), (30.0, 30.0), (40.0, 20.0), (40.0, 50.0)],
            ZodiacSign::Sagittarius => &[(0.0, 0.0), (20.0, 0.0), (10.0, 20.0), (30.0, 20.0), (20.0, 40.0), (40.0, 40.0)],
            ZodiacSign::Capricorn => &[(0.0, 0.0), (20.0, 10.0), (40.0, 0.0), (30.0, -20.0)],
            ZodiacSign::Aquarius => &[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0), (30.0, 10.0), (40.0, 0.0)],
            ZodiacSign::Pisces => &[(0.0, 0.0), (20.0, 20.0), (40.0, 0.0)],
        }
    }

    /// Pattern stars placed in screen pixels.
    pub fn screen_points(self) -> impl Iterator<Item = Vec2> {
        self.pattern()
            .iter()
            .map(|&(x, y)| OVERLAY_ORIGIN + Vec2::new(x, y))
    }
}
