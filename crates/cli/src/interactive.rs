//! Step-by-step consultation on a line-oriented terminal.

use consult_core::{
    render_summary, Answers, Complaint, ConsultService, ConsultationForm, ConsultationRecord, Step,
    Username,
};
use consult_engine::{
    BleedingFrequency, Gender, LastDentalVisit, PainSeverity, PainTrigger, ToothStatus, Wire,
};
use std::io::{BufRead, Write};
use std::str::FromStr;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, line: impl AsRef<str>) -> anyhow::Result<()> {
        writeln!(self.output, "{}", line.as_ref())?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            anyhow::bail!("input ended before the consultation was complete");
        }
        Ok(line.trim().to_string())
    }

    fn ask_optional(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        let answer = self.ask(question)?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    fn ask_number<T: FromStr>(&mut self, question: &str) -> anyhow::Result<Option<T>> {
        loop {
            let Some(answer) = self.ask_optional(question)? else {
                return Ok(None);
            };
            match answer.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say("Please enter a number, or leave blank to skip.")?,
            }
        }
    }

    fn ask_choice<T: Wire>(&mut self, question: &str, options: &[T]) -> anyhow::Result<Option<T>> {
        let listed: Vec<&str> = options.iter().map(|o| o.to_wire()).collect();
        let prompt = format!("{question} ({})", listed.join("/"));
        loop {
            let Some(answer) = self.ask_optional(&prompt)? else {
                return Ok(None);
            };
            match T::from_wire(&answer) {
                Some(value) => return Ok(Some(value)),
                None => self.say(format!("Please choose one of: {}", listed.join(", ")))?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]"))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// Walk the three form steps and optionally save the result.
///
/// Returns the saved record, or `None` if the user declined to save.
pub fn run_consultation<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    service: &ConsultService,
    username: &Username,
) -> anyhow::Result<Option<ConsultationRecord>> {
    let mut form = ConsultationForm::new();

    loop {
        let step = form.step();
        prompter.say(format!("\nStep {} of 3: {}", step.number(), step.title()))?;

        match step {
            Step::PatientInfo => collect_patient_info(prompter, form.answers_mut())?,
            Step::Complaint => collect_complaint(prompter, &mut form)?,
            Step::Summary => {
                let result = form.diagnose()?;
                prompter.say(render_summary(&result))?;
                if !prompter.confirm("Save this consultation")? {
                    return Ok(None);
                }
                let record = service.save(username, form.answers(), &result)?;
                prompter.say(format!("Consultation saved ({}).", record.id))?;
                return Ok(Some(record));
            }
        }

        match form.next() {
            Ok(_) => {}
            Err(e) if e.is_validation() => prompter.say(format!("{e}. Please try again."))?,
            Err(e) => return Err(e.into()),
        }
    }
}

fn collect_patient_info<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    answers: &mut Answers,
) -> anyhow::Result<()> {
    answers.patient_name = p.ask_optional("Patient name")?;
    answers.age = p.ask_number("Age")?;
    answers.gender = p.ask_choice("Gender", &[Gender::Male, Gender::Female, Gender::Other])?;

    let history = &mut answers.medical_history;
    history.diabetes = p.confirm("Diabetic")?;
    history.smoking = p.confirm("Smoker")?;
    history.bleeding_disorder = p.confirm("Bleeding disorder")?;
    history.allergies = p.ask_optional("Known allergies")?;
    history.last_dental_visit = p.ask_choice(
        "Last dental visit",
        &[
            LastDentalVisit::Under6Months,
            LastDentalVisit::From6To12Months,
            LastDentalVisit::Over1Year,
            LastDentalVisit::Never,
        ],
    )?;

    let vitals = &mut answers.vitals;
    vitals.blood_pressure = p.ask_optional("Blood pressure (e.g. 120/80)")?;
    vitals.temperature_c = p.ask_number("Temperature (°C)")?;
    vitals.pulse_bpm = p.ask_number("Pulse (bpm)")?;

    answers.dental_chart.clear();
    if let Some(chart) = p.ask_optional("Teeth with findings (e.g. 16=caries, 21=missing)")? {
        for entry in chart.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match parse_chart_entry(entry) {
                Some((tooth, status)) => {
                    answers.dental_chart.insert(tooth, status);
                }
                None => p.say(format!("Ignoring chart entry '{entry}'"))?,
            }
        }
    }
    Ok(())
}

fn parse_chart_entry(entry: &str) -> Option<(u8, ToothStatus)> {
    let (tooth, status) = entry.split_once('=')?;
    let tooth: u8 = tooth.trim().parse().ok()?;
    if !matches!(tooth / 10, 1..=4) || !matches!(tooth % 10, 1..=8) {
        return None;
    }
    Some((tooth, ToothStatus::from_wire(status)?))
}

fn collect_complaint<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    form: &mut ConsultationForm,
) -> anyhow::Result<()> {
    for (index, complaint) in Complaint::KNOWN.iter().enumerate() {
        p.say(format!("  {}. {}", index + 1, complaint.label()))?;
    }
    let complaint = loop {
        let answer = p.ask("Presenting complaint")?;
        if answer.is_empty() {
            break None;
        }
        let chosen = match answer.parse::<usize>() {
            Ok(n) => Complaint::KNOWN.get(n.wrapping_sub(1)).cloned(),
            Err(_) => Some(Complaint::from_wire(&answer)),
        };
        match chosen {
            Some(c) => break Some(c),
            None => p.say("Please choose a number from the list.")?,
        }
    };

    let answers = form.answers_mut();
    answers.complaint = complaint;
    match answers.complaint {
        Some(Complaint::Toothache) => {
            answers.pain_severity = p.ask_choice(
                "Pain severity",
                &[PainSeverity::Mild, PainSeverity::Moderate, PainSeverity::Severe],
            )?;
            answers.pain_duration_days = p.ask_number("Pain duration (days)")?;
            answers.pain_trigger = p.ask_choice(
                "Pain trigger",
                &[
                    PainTrigger::None,
                    PainTrigger::Cold,
                    PainTrigger::Heat,
                    PainTrigger::Sweet,
                    PainTrigger::Chewing,
                ],
            )?;
        }
        Some(Complaint::BleedingGums) => {
            answers.bleeding_frequency = p.ask_choice(
                "Bleeding frequency",
                &[
                    BleedingFrequency::Rarely,
                    BleedingFrequency::Sometimes,
                    BleedingFrequency::Often,
                    BleedingFrequency::Always,
                ],
            )?;
            answers.bleeding_duration_days = p.ask_number("Bleeding duration (days)")?;
            answers.swelling_location = p.ask_optional("Swelling location, if any")?;
            if answers.swelling_location.is_some() {
                answers.pain_with_swelling = Some(p.confirm("Pain with the swelling")?);
            }
        }
        Some(Complaint::Swelling) => {
            answers.swelling_location = p.ask_optional("Swelling location")?;
            answers.swelling_duration_days = p.ask_number("Swelling duration (days)")?;
            answers.pain_with_swelling = Some(p.confirm("Pain with the swelling")?);
        }
        _ => {}
    }

    answers.high_fever = p.confirm("High fever")?;
    answers.difficulty_swallowing = p.confirm("Difficulty swallowing or breathing")?;
    answers.recent_facial_trauma = p.confirm("Recent facial trauma")?;
    answers.rapid_symptom_worsening = p.confirm("Symptoms worsening rapidly")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_core::{CoreConfig, UrgencyLevel};
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConsultService {
        let cfg = CoreConfig::new(dir.path().to_path_buf(), "admin", None).unwrap();
        ConsultService::new(Arc::new(cfg))
    }

    fn run(script: &[&str], dir: &TempDir) -> (anyhow::Result<Option<ConsultationRecord>>, String) {
        let input = Cursor::new(script.join("\n") + "\n");
        let mut output = Vec::new();
        let result = {
            let mut prompter = Prompter::new(input, &mut output);
            run_consultation(
                &mut prompter,
                &service(dir),
                &Username::new("doctor1").unwrap(),
            )
        };
        (result, String::from_utf8(output).unwrap())
    }

    const PATIENT: [&str; 12] = [
        "Sarah Williams", // name
        "34",             // age
        "female",         // gender
        "n",              // diabetic
        "n",              // smoker
        "n",              // bleeding disorder
        "",               // allergies
        "",               // last visit
        "",               // blood pressure
        "",               // temperature
        "",               // pulse
        "16=caries, 99=missing",
    ];

    #[test]
    fn full_toothache_consultation_is_saved() {
        let dir = TempDir::new().unwrap();
        let mut script: Vec<&str> = PATIENT.to_vec();
        script.extend([
            "1", "severe", "5", "cold", // toothache
            "n", "n", "n", "n", // risk flags
            "y", // save
        ]);

        let (result, output) = run(&script, &dir);
        let record = result.unwrap().expect("saved");
        assert_eq!(record.complaint, Some(Complaint::Toothache));
        assert_eq!(record.urgency_level, UrgencyLevel::Urgent);
        assert!(output.contains("Ignoring chart entry '99=missing'"));
        assert!(output.contains("irreversible pulpitis"));
    }

    #[test]
    fn missing_name_repeats_patient_step() {
        let dir = TempDir::new().unwrap();
        let mut script: Vec<&str> = vec![""];
        script.extend(&PATIENT[1..]);
        script.extend(&PATIENT);
        script.extend(["mouth ulcer", "n", "n", "n", "n", "n"]);

        let (result, output) = run(&script, &dir);
        assert!(result.unwrap().is_none());
        assert!(output.contains("patient name is required"));
        assert!(output.contains("aphthous or traumatic ulcer"));
    }

    #[test]
    fn running_out_of_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (result, _) = run(&["Sarah"], &dir);
        assert!(result.is_err());
    }

    #[test]
    fn chart_entries_must_be_fdi_numbers() {
        assert_eq!(parse_chart_entry("16=caries"), Some((16, ToothStatus::Caries)));
        assert_eq!(parse_chart_entry("48 = restored"), Some((48, ToothStatus::Restored)));
        assert_eq!(parse_chart_entry("19=caries"), None);
        assert_eq!(parse_chart_entry("16=broken"), None);
        assert_eq!(parse_chart_entry("16"), None);
    }
}
