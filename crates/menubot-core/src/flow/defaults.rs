//! Built-in flow table for the BabyHome pediatric practice menu.
//!
//! Used when no `flows_path` is configured. The copy is product text and is
//! returned to users verbatim.

use menubot_types::flow::{Flow, FlowOption, MenuChoice, StateId};

const WELCOME_MESSAGE: &str = "🤖 Chatbot BabyHome – Dra. Carla Narváez
👋 ¡Hola! Gracias por comunicarte.
Por favor, seleccioná una opción escribiendo la letra correspondiente:
A. Realizar consulta médica telefónica
B. Enviar estudios para lectura
C. Solicitar turno en consultorio
D. Consulta sobre BabyHome
(Si es una urgencia, por favor acudí a una guardia)";

const OPTION_A_MESSAGE: &str = "🔸 Respuestas automáticas según opción:

A. Consulta médica telefónica
La consulta telefónica es un acto médico y tiene un valor de $15.000 ARS (no cubierta por obra social).
Para avanzar, enviá:
1️⃣ Nombre y edad del paciente
2️⃣ Motivo de la consulta
3️⃣ Comprobante de pago (Alias: Narvaez.Carla.B)

Información importante:
https://appar.com.ar/consulta-pediatrica-online/

📌 Una vez completados estos pasos, la Dra. se pondrá en contacto.";

const OPTION_B_MESSAGE: &str = "🔸 Respuestas automáticas según opción:

B. Lectura de estudios
Por favor enviá:
1️⃣ Fotos claras o PDF de los estudios
2️⃣ Síntomas actuales y fecha de realización
3️⃣ Tu duda o pregunta principal
4️⃣ Comprobante de pago (Alias: Narvaez.Carla.B) $15.000 ARS

Información importante:
https://appar.com.ar/consulta-pediatrica-online/

📌 Una vez completados estos pasos, la Dra. se pondrá en contacto.";

const OPTION_C_MESSAGE: &str = "🔸 Respuestas automáticas según opción:

C. Solicitar turno en consultorio
Para turnos comunicarse a los siguientes números
– Centro Médico Cervantes (WhatsApp: 343-4066281)
– Consultorios OSPEP (WhatsApp: 343-5138637)";

const OPTION_D_MESSAGE: &str = "🔸 Respuestas automáticas según opción:

D. Información sobre BabyHome
💜 ¡Qué alegría que te interese BabyHome!
Ofrecemos:
✅ Consulta prenatal
✅ Recepción neonatal personalizada (COPAP y primera hora siempre que mamá y bebé estén clínicamente bien)
✅ Controles en domicilio

Para orientarte, contanos:
1️⃣ Semana de embarazo / FPP
2️⃣ Maternidad y obstetra
3️⃣ Si desean priorizar COPAP/primera hora
4️⃣ Si quieren coordinar una consulta prenatal";

const COLLECTING_DATA_MESSAGE: &str = "Gracias por la información. ¿Hay algo más en lo que pueda ayudarte?
Por favor, seleccioná una opción escribiendo la letra correspondiente:
A. Realizar consulta médica telefónica
B. Enviar estudios para lectura
C. Solicitar turno en consultorio
D. Consulta sobre BabyHome";

/// Greeting used when the flow table has no `welcome` flow at all.
pub const FALLBACK_GREETING: &str = "¡Hola! Bienvenido a nuestro servicio.";

/// Menu entries shown by the `welcome` and `collecting_data` flows.
fn menu_options() -> Vec<FlowOption> {
    MenuChoice::ALL
        .iter()
        .map(|choice| FlowOption {
            code: choice.code().to_string(),
            label: choice.code().to_string(),
            description: menu_description(*choice).to_string(),
            next_state: choice.state_id(),
        })
        .collect()
}

fn menu_description(choice: MenuChoice) -> &'static str {
    match choice {
        MenuChoice::A => "Realizar consulta médica telefónica",
        MenuChoice::B => "Enviar estudios para lectura",
        MenuChoice::C => "Solicitar turno en consultorio",
        MenuChoice::D => "Consulta sobre BabyHome",
    }
}

/// The six flows of the built-in menu.
pub fn default_flows() -> Vec<Flow> {
    vec![
        Flow::new(StateId::WELCOME, WELCOME_MESSAGE).with_options(menu_options()),
        Flow::new(MenuChoice::A.state_id(), OPTION_A_MESSAGE)
            .with_data_request("datos_consulta_medica"),
        Flow::new(MenuChoice::B.state_id(), OPTION_B_MESSAGE)
            .with_data_request("datos_lectura_estudios"),
        Flow::new(MenuChoice::C.state_id(), OPTION_C_MESSAGE).with_data_request("datos_turno"),
        Flow::new(MenuChoice::D.state_id(), OPTION_D_MESSAGE).with_data_request("datos_babyhome"),
        Flow::new(StateId::COLLECTING_DATA, COLLECTING_DATA_MESSAGE).with_options(menu_options()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_flows_offer_all_four_options() {
        let flows = default_flows();
        for state in [StateId::WELCOME, StateId::COLLECTING_DATA] {
            let flow = flows.iter().find(|f| f.state.as_str() == state).unwrap();
            let codes: Vec<&str> = flow.options.iter().map(|o| o.code.as_str()).collect();
            assert_eq!(codes, vec!["A", "B", "C", "D"]);
            assert_eq!(flow.options[3].next_state.as_str(), "option_d");
        }
    }

    #[test]
    fn test_option_flows_are_leaves_with_data_tags() {
        for flow in default_flows()
            .iter()
            .filter(|f| MenuChoice::from_state(&f.state).is_some())
        {
            assert!(flow.options.is_empty(), "{} should be a leaf", flow.state);
            assert!(flow.data_request.is_some(), "{} should request data", flow.state);
        }
    }

    #[test]
    fn test_welcome_message_lists_the_menu() {
        assert!(WELCOME_MESSAGE.contains("A. Realizar consulta médica telefónica"));
        assert!(WELCOME_MESSAGE.contains("D. Consulta sobre BabyHome"));
    }
}
