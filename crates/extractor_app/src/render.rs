use extractor_core::{AppViewModel, NoticeLevel, Screen, StepMark};

const BAR_CELLS: usize = 20;

/// Prints a short toast-style notice line.
pub(crate) fn notice(level: NoticeLevel, text: &str) {
    let tag = match level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => " ok ",
        NoticeLevel::Error => "fail",
    };
    println!("[{tag}] {text}");
}

/// Reflects the view model onto the terminal.
pub(crate) fn render(view: &AppViewModel) {
    match view.screen {
        Screen::Upload => {}
        Screen::Progress => {
            if let Some(progress) = &view.progress {
                println!(
                    "{} {:>3}%  {} - {}  ({})",
                    bar(progress.percent),
                    progress.percent,
                    progress.label,
                    progress.message,
                    progress.filename
                );
                println!("       {}", steps_line(progress));
            }
        }
        Screen::Result => {
            if let Some(result) = &view.result {
                println!("Characters generated: {}", result.size_text);
                println!("Completed at:         {}", result.completed_text);
            }
            if let Some(preview) = &view.preview {
                println!("--- preview ---");
                println!("{}", preview.content);
                println!("--- end of preview ---");
            }
        }
    }
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_CELLS / 100;
    let mut out = String::with_capacity(BAR_CELLS + 2);
    out.push('[');
    for cell in 0..BAR_CELLS {
        out.push(if cell < filled { '#' } else { '-' });
    }
    out.push(']');
    out
}

fn steps_line(progress: &extractor_core::ProgressView) -> String {
    progress
        .steps
        .iter()
        .map(|step| {
            let marker = match step.mark {
                StepMark::Done => "[x]",
                StepMark::Active => "[>]",
                StepMark::Upcoming => "[ ]",
            };
            format!("{} {}", marker, step.phase.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}
