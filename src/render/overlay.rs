use anyhow::Result;
use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc;

use crate::posture::{Assessment, Verdict};

const GOOD_COLOR: (f64, f64, f64) = (0.0, 200.0, 0.0);
const POOR_COLOR: (f64, f64, f64) = (0.0, 0.0, 255.0);
const NEUTRAL_COLOR: (f64, f64, f64) = (180.0, 180.0, 180.0);

/// 評価結果をステータス行のテキストと色 (BGR) に変換する
pub fn status_line(assessment: &Assessment) -> (String, Scalar) {
    let (text, (b, g, r)) = match assessment {
        Assessment::NoSubject => ("No person detected".to_string(), NEUTRAL_COLOR),
        Assessment::InsufficientView { view } => {
            (format!("Insufficient view ({})", view.label()), NEUTRAL_COLOR)
        }
        Assessment::Calibrating { done, total, .. } => {
            (format!("Calibrating {}/{}", done, total), NEUTRAL_COLOR)
        }
        Assessment::Evaluated { verdict, .. } => match verdict {
            Verdict::Good => ("Good Posture".to_string(), GOOD_COLOR),
            Verdict::Poor => ("Poor Posture".to_string(), POOR_COLOR),
        },
    };
    (text, Scalar::new(b, g, r, 0.0))
}

/// 指標の角度読み出し行。評価対象がないフレームは None
pub fn angle_line(assessment: &Assessment) -> Option<String> {
    match assessment {
        Assessment::Calibrating { metric, angle, .. } => {
            Some(format!("{}: {:.0} deg", metric.label(), angle))
        }
        Assessment::Evaluated {
            metric,
            angle,
            threshold,
            ..
        } => Some(format!(
            "{}: {:.0} deg (limit {:.0})",
            metric.label(),
            angle,
            threshold
        )),
        _ => None,
    }
}

/// ステータスをフレーム左上に焼き込む
pub fn draw_status(frame: &mut Mat, assessment: &Assessment) -> Result<()> {
    let (text, color) = status_line(assessment);
    put_line(frame, &text, 30, color)?;

    if let Some(readout) = angle_line(assessment) {
        put_line(frame, &readout, 60, Scalar::new(255.0, 255.0, 255.0, 0.0))?;
    }

    Ok(())
}

fn put_line(frame: &mut Mat, text: &str, baseline_y: i32, color: Scalar) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        Point::new(10, baseline_y),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.8,
        color,
        2,
        imgproc::LINE_AA,
        false,
    )?;
    Ok(())
}
