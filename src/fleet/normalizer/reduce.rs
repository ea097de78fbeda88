use crate::fleet::source::Sample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Usage {
    pub percent: f64,
    pub used_bytes: f64,
    pub total_bytes: f64,
}

pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite())
}

pub(crate) fn memory_usage(total: Option<f64>, available: Option<f64>) -> Option<Usage> {
    let total = finite(total).filter(|total| *total > 0.0)?;
    let available = finite(available)?;
    let used = (total - available).max(0.0);
    Some(Usage {
        percent: used / total * 100.0,
        used_bytes: used,
        total_bytes: total,
    })
}

/// Filesystem with the highest usage, joined on mountpoint and device.
/// The first filesystem reaching the maximum is kept.
pub(crate) fn busiest_filesystem(sizes: &[Sample], available: &[Sample]) -> Option<Usage> {
    let mut busiest: Option<Usage> = None;

    for size in sizes {
        if !size.value.is_finite() || size.value <= 0.0 {
            continue;
        }

        let Some(avail) = available.iter().find(|avail| {
            avail.label("mountpoint") == size.label("mountpoint")
                && avail.label("device") == size.label("device")
        }) else {
            continue;
        };
        if !avail.value.is_finite() {
            continue;
        }

        let used = (size.value - avail.value).max(0.0);
        let candidate = Usage {
            percent: used / size.value * 100.0,
            used_bytes: used,
            total_bytes: size.value,
        };

        if busiest.is_none_or(|current| candidate.percent > current.percent) {
            busiest = Some(candidate);
        }
    }

    busiest
}

/// Sum of every finite rate; `None` when no series has a usable value.
pub(crate) fn sum_rates(samples: &[Sample]) -> Option<f64> {
    samples
        .iter()
        .map(|sample| sample.value)
        .filter(|value| value.is_finite())
        .fold(None, |total, value| Some(total.unwrap_or(0.0) + value))
}
