use serde::{Deserialize, Serialize};

/// Nine-step letter scale on a 4.5-point system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    APlus,
    A,
    BPlus,
    B,
    CPlus,
    C,
    DPlus,
    D,
    F,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 9] = [
        Self::APlus,
        Self::A,
        Self::BPlus,
        Self::B,
        Self::CPlus,
        Self::C,
        Self::DPlus,
        Self::D,
        Self::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "B+" => Some(Self::BPlus),
            "B" => Some(Self::B),
            "C+" => Some(Self::CPlus),
            "C" => Some(Self::C),
            "D+" => Some(Self::DPlus),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    /// Grade point on the 4.5 scale. The letter is the single source of the
    /// point value; `GradeRecord` setters recompute through here.
    pub fn point(&self) -> f64 {
        match self {
            Self::APlus => 4.5,
            Self::A => 4.0,
            Self::BPlus => 3.5,
            Self::B => 3.0,
            Self::CPlus => 2.5,
            Self::C => 2.0,
            Self::DPlus => 1.5,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    /// Letter for a 0-100 score via the fixed threshold table.
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            Self::APlus
        } else if score >= 90.0 {
            Self::A
        } else if score >= 85.0 {
            Self::BPlus
        } else if score >= 80.0 {
            Self::B
        } else if score >= 75.0 {
            Self::CPlus
        } else if score >= 70.0 {
            Self::C
        } else if score >= 65.0 {
            Self::DPlus
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

/// An earned grade for a subject in one semester (label like "2025-1").
/// `grade_point` is persisted alongside the letter but always derived from
/// it when set through the methods here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub id: i32,
    pub subject_id: i32,
    pub semester: String,
    pub score: f64,
    pub letter: LetterGrade,
    pub grade_point: f64,
}

impl GradeRecord {
    pub fn new(subject_id: i32, semester: impl Into<String>, score: f64, letter: LetterGrade) -> Self {
        Self {
            id: 0,
            subject_id,
            semester: semester.into(),
            score,
            letter,
            grade_point: letter.point(),
        }
    }

    pub fn set_letter(&mut self, letter: LetterGrade) {
        self.letter = letter;
        self.grade_point = letter.point();
    }

    /// Stores the score and re-derives letter and point from it.
    pub fn apply_score(&mut self, score: f64) {
        self.score = score;
        self.set_letter(LetterGrade::from_score(score));
    }

    pub fn passed(&self) -> bool {
        self.letter != LetterGrade::F
    }
}

/// Ad hoc grade entry from the calculator panel: keyed by subject name, not
/// by id, and outside the cascade/event machinery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGrade {
    pub subject_name: String,
    pub letter: LetterGrade,
    pub gpa: f64,
    pub credits: u32,
    pub is_major: bool,
}

impl UserGrade {
    pub fn new(
        subject_name: impl Into<String>,
        letter: LetterGrade,
        credits: u32,
        is_major: bool,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            letter,
            gpa: letter.point(),
            credits,
            is_major,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_round_trips_through_str() {
        for letter in LetterGrade::ALL {
            assert_eq!(LetterGrade::from_str(letter.as_str()), Some(letter));
        }
    }

    #[test]
    fn score_thresholds_are_inclusive() {
        assert_eq!(LetterGrade::from_score(95.0), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_score(94.9), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(60.0), LetterGrade::D);
        assert_eq!(LetterGrade::from_score(59.9), LetterGrade::F);
    }

    #[test]
    fn setting_letter_recomputes_point() {
        let mut record = GradeRecord::new(1, "2025-1", 91.0, LetterGrade::A);
        assert_eq!(record.grade_point, 4.0);
        record.set_letter(LetterGrade::BPlus);
        assert_eq!(record.grade_point, 3.5);
        record.apply_score(97.0);
        assert_eq!(record.letter, LetterGrade::APlus);
        assert_eq!(record.grade_point, 4.5);
    }
}
