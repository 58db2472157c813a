/// 角度サンプルのEMA平滑化フィルタ
///
/// 姿勢推定の出力は静止していてもフレームごとに揺れるため、
/// キャリブレーションと判定の前に平滑化をかける。
/// alpha = 1.0 で実質無効（そのまま通す）
pub struct AngleSmoother {
    alpha: f32,
    prev: Option<f32>,
}

impl AngleSmoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, prev: None }
    }

    pub fn apply(&mut self, value: f32) -> f32 {
        let result = match self.prev {
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
            None => value,
        };
        self.prev = Some(result);
        result
    }

    /// 被写体を見失ったときに呼ぶ。次のサンプルはそのまま通る
    pub fn reset(&mut self) {
        self.prev = None;
    }
}
